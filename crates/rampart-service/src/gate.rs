// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Owner-only authorization for the policy-management API.
//!
//! The gate decides whether an identity may manage a bucket's policy.
//! Its check ordering is a hard invariant: bucket existence is reported
//! before ownership, and ownership before anything content-related, so
//! a caller always observes the same error for the same state.

use rampart_core::types::{AccountId, BucketInfo};
use rampart_core::Result;
use rampart_store::PolicyBackend;
use tracing::debug;

/// The policy-management operations subject to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAccess {
    /// Retrieve the bucket policy.
    Get,
    /// Store or replace the bucket policy.
    Put,
    /// Remove the bucket policy.
    Delete,
}

impl PolicyAccess {
    /// Returns the S3 action string for this operation.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Get => "s3:GetBucketPolicy",
            Self::Put => "s3:PutBucketPolicy",
            Self::Delete => "s3:DeleteBucketPolicy",
        }
    }
}

/// The outcome of an authorization check.
///
/// A closed type rather than an error used for control flow: callers
/// match on the decision and map denials to the error taxonomy.
#[derive(Debug)]
pub enum AccessDecision {
    /// The identity owns the bucket; the operation may proceed.
    Allowed(BucketInfo),
    /// The operation must not proceed.
    Denied(DenyReason),
}

/// Why an authorization check denied the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The target bucket does not exist. Takes precedence over any
    /// permission check.
    BucketNotFound,
    /// The bucket exists but the caller is not its owner. Policy
    /// management is owner-only regardless of any stored policy
    /// statements.
    NotOwner,
}

/// Decide whether `identity` may perform `access` on `bucket`.
///
/// Existence is checked strictly before ownership. Store faults during
/// the lookup propagate as errors; they are not authorization outcomes.
///
/// # Errors
///
/// Returns an error only for underlying store failures.
pub async fn authorize<B: PolicyBackend>(
    backend: &B,
    identity: &AccountId,
    bucket: &str,
    access: PolicyAccess,
) -> Result<AccessDecision> {
    if !backend.bucket_exists(bucket).await? {
        debug!(bucket, action = access.action(), "Denied: bucket not found");
        return Ok(AccessDecision::Denied(DenyReason::BucketNotFound));
    }

    let info = backend.get_bucket(bucket).await?;
    if !info.is_owned_by(identity) {
        debug!(bucket, %identity, action = access.action(), "Denied: not bucket owner");
        return Ok(AccessDecision::Denied(DenyReason::NotOwner));
    }

    Ok(AccessDecision::Allowed(info))
}
