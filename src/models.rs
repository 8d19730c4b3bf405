// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the challenge endpoints. All types derive
//! `ToSchema` for the OpenAPI document.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::challenge::ValidationFailure;

/// A challenge transaction, anchor-signed and transport-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChallengeResponse {
    /// Base64 envelope
    pub transaction: String,
}

/// A challenge returned by the client after adding its signature.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TransactionRequest {
    /// Base64 envelope
    #[serde(default)]
    pub transaction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// HS256 JWT; `sub` is the authenticated account
    pub token: String,
}

/// One failed challenge check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FailureDetail {
    pub code: String,
    pub message: String,
}

impl From<ValidationFailure> for FailureDetail {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            code: failure.code().to_string(),
            message: failure.to_string(),
        }
    }
}

/// Error envelope returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    /// Field errors, failure details or error codes, depending on endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub errors: Option<serde_json::Value>,
}
