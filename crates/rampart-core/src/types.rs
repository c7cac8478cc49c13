// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Common types used throughout Rampart.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The canonical account identifier of an authenticated caller.
///
/// Ownership comparison against a bucket's `owner` is the sole
/// authorization axis for policy management.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new account identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Metadata for a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Bucket name (globally unique).
    pub name: String,
    /// The account that owns the bucket.
    pub owner: AccountId,
    /// When the bucket was created.
    pub created_at: DateTime<Utc>,
}

impl BucketInfo {
    /// Creates a new bucket info with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: AccountId) -> Self {
        Self { name: name.into(), owner, created_at: Utc::now() }
    }

    /// Returns true if the given identity owns this bucket.
    #[must_use]
    pub fn is_owned_by(&self, identity: &AccountId) -> bool {
        self.owner == *identity
    }
}

/// A policy document as stored for a bucket.
///
/// The raw bytes are kept verbatim as submitted so that a get after a put
/// returns exactly what the caller wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPolicy {
    /// The policy document exactly as submitted.
    pub raw: Bytes,
    /// When the policy was last written.
    pub last_modified: DateTime<Utc>,
}

impl StoredPolicy {
    /// Creates a stored policy stamped with the current time.
    #[must_use]
    pub fn new(raw: Bytes) -> Self {
        Self { raw, last_modified: Utc::now() }
    }
}
