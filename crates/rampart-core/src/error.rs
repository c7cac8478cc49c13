// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Error types for Rampart with S3-compatible error codes.

use thiserror::Error;

/// A specialized `Result` type for Rampart operations.
pub type Result<T> = std::result::Result<T, Error>;

/// S3-compatible error codes surfaced by the policy subsystem.
///
/// This taxonomy is closed: every failure a caller can observe maps to
/// exactly one of these codes, and each code carries a fixed HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S3ErrorCode {
    /// The specified bucket does not exist.
    NoSuchBucket,
    /// The specified bucket does not have a bucket policy.
    NoSuchBucketPolicy,
    /// The specified method is not allowed against this resource.
    ///
    /// Policy management is owner-only; a non-owner caller observes this
    /// code rather than `AccessDenied`.
    MethodNotAllowed,
    /// The submitted policy document is not well-formed.
    MalformedPolicy,
    /// The submitted policy document exceeds the maximum allowed size.
    PolicyTooLarge,
    /// The specified bucket already exists.
    BucketAlreadyExists,
    /// Access denied.
    AccessDenied,
    /// Internal server error.
    InternalError,
}

impl S3ErrorCode {
    /// Returns the HTTP status code for this error.
    ///
    /// Status numbers are fixed constants, never computed from context.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::NoSuchBucket | Self::NoSuchBucketPolicy => 404,
            Self::MethodNotAllowed => 405,
            Self::MalformedPolicy | Self::PolicyTooLarge => 400,
            Self::BucketAlreadyExists => 409,
            Self::AccessDenied => 403,
            Self::InternalError => 500,
        }
    }

    /// Returns the HTTP status code as an `http::StatusCode`.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns the stable machine-readable error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchBucketPolicy => "NoSuchBucketPolicy",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::MalformedPolicy => "MalformedPolicy",
            Self::PolicyTooLarge => "PolicyTooLarge",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::AccessDenied => "AccessDenied",
            Self::InternalError => "InternalError",
        }
    }
}

impl std::fmt::Display for S3ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during Rampart operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An S3 API error with a specific error code.
    #[error("{code}: {message}")]
    S3 {
        /// The S3 error code.
        code: S3ErrorCode,
        /// A human-readable error message.
        message: String,
        /// The resource that caused the error (bucket name, etc.).
        resource: Option<String>,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error. Distinguished from domain errors so the store
    /// layer can retry transient faults.
    #[error("database error: {0}")]
    Database(String),
}

impl Error {
    /// Creates a new S3 error.
    #[must_use]
    pub fn s3(code: S3ErrorCode, message: impl Into<String>) -> Self {
        Self::S3 { code, message: message.into(), resource: None }
    }

    /// Creates a new S3 error with a resource.
    #[must_use]
    pub fn s3_with_resource(
        code: S3ErrorCode,
        message: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self::S3 { code, message: message.into(), resource: Some(resource.into()) }
    }

    /// Returns the S3 error code, if this is an S3 error.
    #[must_use]
    pub const fn s3_error_code(&self) -> Option<S3ErrorCode> {
        match self {
            Self::S3 { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if this error represents a transient storage fault
    /// rather than a deterministic domain error.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Io(_))
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::S3 { code, .. } => code.http_status(),
            Self::Config(_) => 400,
            Self::Io(_) | Self::Database(_) => 500,
        }
    }
}
