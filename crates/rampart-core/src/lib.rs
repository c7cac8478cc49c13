// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Core types for the Rampart bucket-policy subsystem.
//!
//! This crate provides the building blocks shared across all Rampart
//! components:
//! - Error types with S3-compatible error codes
//! - The bucket policy document model and validator
//! - Common data types (account identity, bucket metadata)
//! - Configuration management

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod policy;
pub mod types;

pub use config::{Config, PolicyConfig, StoreConfig, SyncStrategy};
pub use error::{Error, Result, S3ErrorCode};
pub use policy::{validate_policy, Effect, PolicyDocument, Statement};
pub use types::{AccountId, BucketInfo, StoredPolicy};
