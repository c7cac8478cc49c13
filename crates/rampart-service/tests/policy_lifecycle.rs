// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! End-to-end bucket policy lifecycle tests.
//!
//! These exercise the full pipeline (gate, validator, store) through
//! `PolicyService` over an in-memory store, mirroring the aws-sdk
//! functional scenarios for get/put/delete bucket policy.

use bytes::Bytes;
use rampart_core::error::S3ErrorCode;
use rampart_core::types::AccountId;
use rampart_core::PolicyConfig;
use rampart_service::PolicyService;
use rampart_store::{PolicyBackend, RedbPolicyStore};

fn service() -> PolicyService<RedbPolicyStore> {
    let store = RedbPolicyStore::open_in_memory().expect("in-memory store");
    PolicyService::new(store, PolicyConfig::default())
}

fn owner() -> AccountId {
    AccountId::new("owner-canonical-id")
}

fn other_account() -> AccountId {
    AccountId::new("lisa-canonical-id")
}

fn simple_policy(bucket: &str) -> Bytes {
    let policy = serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "testid",
            "Effect": "Allow",
            "Principal": "*",
            "Action": "s3:putBucketPolicy",
            "Resource": format!("arn:aws:s3:::{bucket}")
        }]
    });
    Bytes::from(policy.to_string())
}

#[tokio::test]
async fn test_get_policy_nonexistent_bucket() {
    let svc = service();

    let err = svc.get_policy(&owner(), "no-such-bucket").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::NoSuchBucket);
    assert_eq!(err.status_code().as_u16(), 404);
}

#[tokio::test]
async fn test_get_policy_non_owner() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    // Denied whether or not a policy is stored
    let err = svc.get_policy(&other_account(), "b").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::MethodNotAllowed);
    assert_eq!(err.status_code().as_u16(), 405);

    svc.put_policy(&owner(), "b", simple_policy("b")).await.unwrap();
    let err = svc.get_policy(&other_account(), "b").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::MethodNotAllowed);
}

#[tokio::test]
async fn test_get_policy_no_policy_stored() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    let err = svc.get_policy(&owner(), "b").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::NoSuchBucketPolicy);
    assert_eq!(err.status_code().as_u16(), 404);
}

#[tokio::test]
async fn test_existence_checked_before_ownership() {
    let svc = service();

    // A non-owner request against a missing bucket reports NoSuchBucket,
    // not MethodNotAllowed
    let err = svc.get_policy(&other_account(), "no-such-bucket").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::NoSuchBucket);

    let err = svc.put_policy(&other_account(), "no-such-bucket", simple_policy("b")).await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::NoSuchBucket);

    let err = svc.delete_policy(&other_account(), "no-such-bucket").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::NoSuchBucket);
}

#[tokio::test]
async fn test_unauthorized_put_does_not_reveal_validation() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    // The document is malformed, but a non-owner must see the
    // authorization failure, not MalformedPolicy
    let err = svc
        .put_policy(&other_account(), "b", Bytes::from_static(b"not valid json"))
        .await
        .unwrap_err();
    assert_eq!(err.code, S3ErrorCode::MethodNotAllowed);
}

#[tokio::test]
async fn test_put_then_get_roundtrip() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    let raw = simple_policy("b");
    svc.put_policy(&owner(), "b", raw.clone()).await.unwrap();

    let stored = svc.get_policy(&owner(), "b").await.unwrap();
    assert_eq!(stored.raw, raw, "stored bytes must round-trip verbatim");

    let parsed: serde_json::Value = serde_json::from_slice(&stored.raw).unwrap();
    let expected = serde_json::json!({
        "Sid": "testid",
        "Effect": "Allow",
        "Principal": "*",
        "Action": "s3:putBucketPolicy",
        "Resource": "arn:aws:s3:::b"
    });
    assert_eq!(parsed["Statement"][0], expected);
}

#[tokio::test]
async fn test_put_is_idempotent() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    let raw = simple_policy("b");
    svc.put_policy(&owner(), "b", raw.clone()).await.unwrap();
    svc.put_policy(&owner(), "b", raw.clone()).await.unwrap();

    let stored = svc.get_policy(&owner(), "b").await.unwrap();
    assert_eq!(stored.raw, raw);
}

#[tokio::test]
async fn test_put_replaces_rather_than_merges() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    svc.put_policy(&owner(), "b", simple_policy("b")).await.unwrap();

    let replacement = serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "replacement",
            "Effect": "Deny",
            "Principal": "*",
            "Action": "s3:DeleteObject",
            "Resource": "arn:aws:s3:::b/*"
        }]
    });
    let replacement = Bytes::from(replacement.to_string());
    svc.put_policy(&owner(), "b", replacement.clone()).await.unwrap();

    let stored = svc.get_policy(&owner(), "b").await.unwrap();
    assert_eq!(stored.raw, replacement);

    let parsed: serde_json::Value = serde_json::from_slice(&stored.raw).unwrap();
    assert_eq!(parsed["Statement"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["Statement"][0]["Sid"], "replacement");
}

#[tokio::test]
async fn test_malformed_put_leaves_previous_policy() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    let raw = simple_policy("b");
    svc.put_policy(&owner(), "b", raw.clone()).await.unwrap();

    let err = svc
        .put_policy(&owner(), "b", Bytes::from_static(b"{\"Version\": \"2012-10-17\"}"))
        .await
        .unwrap_err();
    assert_eq!(err.code, S3ErrorCode::MalformedPolicy);
    assert_eq!(err.status_code().as_u16(), 400);

    let stored = svc.get_policy(&owner(), "b").await.unwrap();
    assert_eq!(stored.raw, raw, "rejected put must not disturb the stored policy");
}

#[tokio::test]
async fn test_oversized_put_is_rejected() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    let padding = "x".repeat(21 * 1024);
    let policy = serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": padding,
            "Effect": "Allow",
            "Principal": "*",
            "Action": "s3:GetObject",
            "Resource": "arn:aws:s3:::b/*"
        }]
    });

    let err = svc.put_policy(&owner(), "b", Bytes::from(policy.to_string())).await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::PolicyTooLarge);
}

#[tokio::test]
async fn test_delete_policy() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    svc.put_policy(&owner(), "b", simple_policy("b")).await.unwrap();
    svc.delete_policy(&owner(), "b").await.unwrap();

    let err = svc.get_policy(&owner(), "b").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::NoSuchBucketPolicy);

    // Deleting again still succeeds
    svc.delete_policy(&owner(), "b").await.unwrap();
}

#[tokio::test]
async fn test_delete_policy_non_owner() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();
    svc.put_policy(&owner(), "b", simple_policy("b")).await.unwrap();

    let err = svc.delete_policy(&other_account(), "b").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::MethodNotAllowed);

    // The policy is still there for the owner
    svc.get_policy(&owner(), "b").await.unwrap();
}

#[tokio::test]
async fn test_bucket_deletion_discards_policy() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();
    svc.put_policy(&owner(), "b", simple_policy("b")).await.unwrap();

    svc.delete_bucket(&owner(), "b").await.unwrap();

    svc.create_bucket(&owner(), "b").await.unwrap();
    let err = svc.get_policy(&owner(), "b").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::NoSuchBucketPolicy);
}

#[tokio::test]
async fn test_buckets_do_not_share_policies() {
    let svc = service();
    svc.create_bucket(&owner(), "a").await.unwrap();
    svc.create_bucket(&owner(), "b").await.unwrap();

    svc.put_policy(&owner(), "a", simple_policy("a")).await.unwrap();

    let err = svc.get_policy(&owner(), "b").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::NoSuchBucketPolicy);
}

#[tokio::test]
async fn test_create_bucket_twice() {
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();

    let err = svc.create_bucket(&owner(), "b").await.unwrap_err();
    assert_eq!(err.code, S3ErrorCode::BucketAlreadyExists);
    assert_eq!(err.status_code().as_u16(), 409);
}

#[tokio::test]
async fn test_store_accessible_via_backend() {
    // The service fronts the store; direct store access agrees with it
    let svc = service();
    svc.create_bucket(&owner(), "b").await.unwrap();
    svc.put_policy(&owner(), "b", simple_policy("b")).await.unwrap();

    let stored = svc.backend().get_policy("b").await.unwrap();
    assert_eq!(stored.raw, simple_policy("b"));
}
