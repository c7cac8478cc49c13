// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Classification of internal failures into the closed error taxonomy.
//!
//! The request-handling layer only ever sees a [`ClassifiedError`]: a
//! stable code, a message, and a fixed status class. Unclassified
//! internal faults are logged here and collapsed to `InternalError`
//! without detail.

use http::StatusCode;
use rampart_core::error::{Error as CoreError, S3ErrorCode};
use tracing::error;

/// A classified error suitable for protocol translation by the caller.
#[derive(Debug)]
pub struct ClassifiedError {
    /// S3 error code.
    pub code: S3ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Resource that caused the error (bucket name, etc.).
    pub resource: Option<String>,
    /// Request ID for tracking.
    pub request_id: String,
}

impl ClassifiedError {
    /// Create a new classified error.
    #[must_use]
    pub fn new(code: S3ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            resource: None,
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Add resource information to the error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ClassifiedError {}

impl From<CoreError> for ClassifiedError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::S3 { code, message, resource } => {
                let mut classified = ClassifiedError::new(code, message);
                if let Some(r) = resource {
                    classified = classified.with_resource(r);
                }
                classified
            }
            // Storage and configuration faults are never detailed to the
            // caller; the specifics go to the log under the request id.
            CoreError::Io(_) | CoreError::Database(_) | CoreError::Config(_) => {
                let classified =
                    ClassifiedError::new(S3ErrorCode::InternalError, "We encountered an internal error. Please try again.");
                error!(request_id = %classified.request_id, %err, "Unclassified internal failure");
                classified
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_keeps_code_and_resource() {
        let err = CoreError::s3_with_resource(
            S3ErrorCode::NoSuchBucketPolicy,
            "The bucket policy does not exist",
            "my-bucket",
        );

        let classified = ClassifiedError::from(err);
        assert_eq!(classified.code, S3ErrorCode::NoSuchBucketPolicy);
        assert_eq!(classified.resource.as_deref(), Some("my-bucket"));
        assert_eq!(classified.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_fault_is_not_detailed() {
        let err = CoreError::Database("page checksum mismatch at 0x3f2a".to_string());

        let classified = ClassifiedError::from(err);
        assert_eq!(classified.code, S3ErrorCode::InternalError);
        assert_eq!(classified.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!classified.message.contains("checksum"));
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ClassifiedError::new(S3ErrorCode::NoSuchBucket, "").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ClassifiedError::new(S3ErrorCode::MethodNotAllowed, "").status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ClassifiedError::new(S3ErrorCode::MalformedPolicy, "").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = ClassifiedError::new(S3ErrorCode::InternalError, "");
        let b = ClassifiedError::new(S3ErrorCode::InternalError, "");
        assert_ne!(a.request_id, b.request_id);
    }
}
