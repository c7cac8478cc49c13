// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Policy-management service layer for Rampart.
//!
//! This crate composes the store and validator behind the three
//! policy-management operations an S3 request handler calls:
//! `get_policy`, `put_policy`, and `delete_policy`. It owns the
//! owner-only authorization gate and the classification of internal
//! failures into the closed S3 error taxonomy.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
pub mod gate;
pub mod service;

pub use classify::ClassifiedError;
pub use gate::{authorize, AccessDecision, DenyReason, PolicyAccess};
pub use service::PolicyService;
