// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Durable per-bucket policy storage for Rampart.
//!
//! This crate provides:
//! - The [`PolicyBackend`] trait the service layer is written against
//! - A redb-based implementation with atomic per-bucket updates

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod redb_backend;

pub use backend::PolicyBackend;
pub use redb_backend::RedbPolicyStore;
