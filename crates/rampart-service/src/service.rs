// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! The policy-management orchestrator.

use bytes::Bytes;
use rampart_core::policy::validate_policy;
use rampart_core::types::{AccountId, BucketInfo, StoredPolicy};
use rampart_core::{PolicyConfig, S3ErrorCode};
use rampart_store::PolicyBackend;
use tracing::debug;

use crate::classify::ClassifiedError;
use crate::gate::{authorize, AccessDecision, DenyReason, PolicyAccess};

/// The component an external request handler calls for bucket-policy
/// operations.
///
/// Stateless across requests; every call is a single atomic attempt with
/// the fixed pipeline: authorization gate, then (for put) validation,
/// then the store. An unauthorized caller never learns whether their
/// document would have validated.
pub struct PolicyService<B> {
    backend: B,
    config: PolicyConfig,
}

impl<B: PolicyBackend> PolicyService<B> {
    /// Creates a service over the given backend.
    #[must_use]
    pub fn new(backend: B, config: PolicyConfig) -> Self {
        Self { backend, config }
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create a bucket owned by `identity`.
    ///
    /// Bucket creation itself is external to policy management; this
    /// front exists so collaborators and tests drive the full lifecycle
    /// through one surface.
    ///
    /// # Errors
    ///
    /// `BucketAlreadyExists` if the name is taken.
    pub async fn create_bucket(
        &self,
        identity: &AccountId,
        bucket: &str,
    ) -> Result<BucketInfo, ClassifiedError> {
        Ok(self.backend.create_bucket(bucket, identity.clone()).await?)
    }

    /// Delete a bucket, discarding any stored policy.
    ///
    /// Same existence-before-ownership ordering as the policy
    /// operations; only the owner may delete.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` if absent, `AccessDenied` for a non-owner.
    pub async fn delete_bucket(
        &self,
        identity: &AccountId,
        bucket: &str,
    ) -> Result<(), ClassifiedError> {
        if !self.backend.bucket_exists(bucket).await? {
            return Err(ClassifiedError::new(
                S3ErrorCode::NoSuchBucket,
                "The specified bucket does not exist",
            )
            .with_resource(bucket));
        }
        let info = self.backend.get_bucket(bucket).await?;
        if !info.is_owned_by(identity) {
            return Err(ClassifiedError::new(S3ErrorCode::AccessDenied, "Access Denied")
                .with_resource(bucket));
        }
        Ok(self.backend.delete_bucket(bucket).await?)
    }

    /// `getBucketPolicy`: return the stored document verbatim.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `MethodNotAllowed`, or `NoSuchBucketPolicy`.
    pub async fn get_policy(
        &self,
        identity: &AccountId,
        bucket: &str,
    ) -> Result<StoredPolicy, ClassifiedError> {
        self.check_access(identity, bucket, PolicyAccess::Get).await?;
        Ok(self.backend.get_policy(bucket).await?)
    }

    /// `putBucketPolicy`: validate and atomically replace the bucket's
    /// policy with `raw`.
    ///
    /// Validation runs strictly after authorization, and a rejected
    /// document leaves any previously stored policy unchanged.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `MethodNotAllowed`, `MalformedPolicy`, or
    /// `PolicyTooLarge`.
    pub async fn put_policy(
        &self,
        identity: &AccountId,
        bucket: &str,
        raw: Bytes,
    ) -> Result<(), ClassifiedError> {
        self.check_access(identity, bucket, PolicyAccess::Put).await?;

        let document = validate_policy(&raw, self.config.max_document_size)?;
        debug!(bucket, statements = document.statement.len(), "Policy validated");

        self.backend.put_policy(bucket, raw).await?;
        Ok(())
    }

    /// `deleteBucketPolicy`: remove the bucket's policy.
    ///
    /// Deleting an absent policy succeeds.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `MethodNotAllowed`.
    pub async fn delete_policy(
        &self,
        identity: &AccountId,
        bucket: &str,
    ) -> Result<(), ClassifiedError> {
        self.check_access(identity, bucket, PolicyAccess::Delete).await?;
        self.backend.delete_policy(bucket).await?;
        Ok(())
    }

    async fn check_access(
        &self,
        identity: &AccountId,
        bucket: &str,
        access: PolicyAccess,
    ) -> Result<BucketInfo, ClassifiedError> {
        match authorize(&self.backend, identity, bucket, access).await? {
            AccessDecision::Allowed(info) => Ok(info),
            AccessDecision::Denied(DenyReason::BucketNotFound) => Err(ClassifiedError::new(
                S3ErrorCode::NoSuchBucket,
                "The specified bucket does not exist",
            )
            .with_resource(bucket)),
            AccessDecision::Denied(DenyReason::NotOwner) => Err(ClassifiedError::new(
                S3ErrorCode::MethodNotAllowed,
                "The specified method is not allowed against this resource",
            )
            .with_resource(bucket)),
        }
    }
}
