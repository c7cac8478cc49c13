// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Policy storage backend trait definition.

use async_trait::async_trait;
use bytes::Bytes;
use rampart_core::types::{AccountId, BucketInfo, StoredPolicy};
use rampart_core::Result;

/// Trait for policy storage backends.
///
/// A backend is a keyed blob slot: each bucket holds at most one policy
/// document, and a put is a full replace. Backends must provide
/// read-after-write consistency per bucket, and a reader must never
/// observe a partially written document.
///
/// The backend does not interpret document contents; validation happens
/// in the service layer before a put reaches the store.
#[async_trait]
pub trait PolicyBackend: Send + Sync + 'static {
    // === Bucket operations ===

    /// Create a new bucket owned by the given account.
    ///
    /// # Errors
    ///
    /// Returns `BucketAlreadyExists` if a bucket with this name exists.
    async fn create_bucket(&self, name: &str, owner: AccountId) -> Result<BucketInfo>;

    /// Delete a bucket, discarding any stored policy.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    async fn delete_bucket(&self, name: &str) -> Result<()>;

    /// Check whether a bucket exists.
    async fn bucket_exists(&self, name: &str) -> Result<bool>;

    /// Get bucket metadata by name.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket does not exist.
    async fn get_bucket(&self, name: &str) -> Result<BucketInfo>;

    // === Policy operations ===

    /// Get the stored policy for a bucket.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket record is missing, or
    /// `NoSuchBucketPolicy` if the bucket exists with no policy.
    async fn get_policy(&self, name: &str) -> Result<StoredPolicy>;

    /// Atomically replace the bucket's policy with the given raw bytes.
    ///
    /// The bytes are stored verbatim; a subsequent `get_policy` returns
    /// exactly what was written here.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket record is missing.
    async fn put_policy(&self, name: &str, raw: Bytes) -> Result<()>;

    /// Remove the bucket's policy slot.
    ///
    /// Deleting an absent policy is not an error at this layer.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBucket` if the bucket record is missing.
    async fn delete_policy(&self, name: &str) -> Result<()>;
}
