// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Bucket policy document model and structural validation.
//!
//! This module defines the typed form of an IAM-style bucket policy and
//! the checks applied before a document is accepted for storage. It does
//! not evaluate policies; condition blocks are carried opaquely.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, S3ErrorCode};

/// The single supported policy language version.
pub const POLICY_VERSION: &str = "2012-10-17";

/// A bucket policy document following the AWS IAM policy format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// The policy language version. Must equal [`POLICY_VERSION`].
    pub version: String,
    /// An optional identifier for the policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The policy statements, in order. Order is preserved and
    /// semantically significant for evaluation.
    pub statement: Vec<Statement>,
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// An optional identifier, unique within the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Whether this statement allows or denies access.
    pub effect: Effect,
    /// The principal(s) this statement applies to.
    pub principal: Principal,
    /// The action(s) this statement covers.
    pub action: StringOrArray,
    /// The resource(s) this statement covers.
    pub resource: StringOrArray,
    /// Optional condition block. Carried opaquely; Rampart validates
    /// document shape only and does not evaluate conditions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<serde_json::Value>,
}

/// The effect of a policy statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Allow the action.
    Allow,
    /// Deny the action.
    Deny,
}

/// The principal(s) a statement applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Principal {
    /// Wildcard - applies to everyone.
    Wildcard(WildcardPrincipal),
    /// Specific principals.
    Specific(PrincipalSpec),
}

/// Represents a wildcard principal `"*"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildcardPrincipal;

impl Serialize for WildcardPrincipal {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("*")
    }
}

impl<'de> Deserialize<'de> for WildcardPrincipal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "*" {
            Ok(WildcardPrincipal)
        } else {
            Err(serde::de::Error::custom("expected \"*\""))
        }
    }
}

/// Specific principal specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrincipalSpec {
    /// AWS account ARNs or canonical account IDs.
    #[serde(default, rename = "AWS", skip_serializing_if = "Option::is_none")]
    pub aws: Option<StringOrArray>,
}

/// Either a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrArray {
    /// A single string.
    Single(String),
    /// An array of strings.
    Array(Vec<String>),
}

impl StringOrArray {
    /// Returns an iterator over the values.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        match self {
            StringOrArray::Single(s) => std::slice::from_ref(s).iter(),
            StringOrArray::Array(v) => v.iter(),
        }
        .map(String::as_str)
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            StringOrArray::Single(_) => 1,
            StringOrArray::Array(v) => v.len(),
        }
    }

    /// Returns true if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn malformed(message: impl Into<String>) -> Error {
    Error::s3(S3ErrorCode::MalformedPolicy, message)
}

/// Parses and structurally validates a submitted policy document.
///
/// Checks, in order: size ceiling, JSON shape, version string, non-empty
/// statement list, per-statement field shapes, and `Sid` uniqueness.
/// The first failing check wins; no partial results are surfaced.
///
/// # Errors
///
/// `PolicyTooLarge` if `raw` exceeds `max_size`; `MalformedPolicy` for
/// every other rejection.
pub fn validate_policy(raw: &[u8], max_size: usize) -> Result<PolicyDocument> {
    if raw.len() > max_size {
        return Err(Error::s3(
            S3ErrorCode::PolicyTooLarge,
            format!("Policy exceeds the maximum allowed size of {max_size} bytes"),
        ));
    }

    let document: PolicyDocument = serde_json::from_slice(raw)
        .map_err(|e| malformed(format!("Invalid policy JSON: {e}")))?;

    document.validate()?;

    Ok(document)
}

impl PolicyDocument {
    /// Parses a policy document from JSON without a size check.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPolicy` if the JSON does not match the schema.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| malformed(format!("Invalid policy JSON: {e}")))
    }

    /// Serializes the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::s3(S3ErrorCode::InternalError, format!("serialize policy: {e}")))
    }

    /// Validates the document structure and semantics.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPolicy` on the first failing check.
    pub fn validate(&self) -> Result<()> {
        if self.version != POLICY_VERSION {
            return Err(malformed(format!(
                "Invalid policy version: {}. Must be \"{POLICY_VERSION}\"",
                self.version
            )));
        }

        if self.statement.is_empty() {
            return Err(malformed("Policy must contain at least one statement"));
        }

        for (i, stmt) in self.statement.iter().enumerate() {
            stmt.validate().map_err(|e| malformed(format!("Statement {i}: {e}")))?;
        }

        // Sids are advisory but must be unique across the document
        let mut seen = HashSet::new();
        for stmt in &self.statement {
            if let Some(sid) = &stmt.sid {
                if !seen.insert(sid.as_str()) {
                    return Err(malformed(format!("Duplicate statement Sid: {sid}")));
                }
            }
        }

        Ok(())
    }
}

impl Statement {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.action.is_empty() {
            return Err("Action must not be empty".to_string());
        }
        for action in self.action.iter() {
            if !action.starts_with("s3:") && action != "*" {
                return Err(format!("Invalid S3 action: {action}"));
            }
        }

        if self.resource.is_empty() {
            return Err("Resource must not be empty".to_string());
        }
        for resource in self.resource.iter() {
            if !resource.starts_with("arn:aws:s3:::") && resource != "*" {
                return Err(format!("Invalid S3 resource ARN: {resource}"));
            }
        }

        if let Principal::Specific(spec) = &self.principal {
            match &spec.aws {
                Some(aws) if !aws.is_empty() => {}
                _ => return Err("Principal must name at least one grantee".to_string()),
            }
        }

        Ok(())
    }
}
