// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for accounts holding an anchor token.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(account): Auth) -> impl IntoResponse {
//!     // account is AuthenticatedAccount
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedAccount};
use crate::state::AppState;

/// Extractor for authenticated accounts.
///
/// Validates the bearer token from the Authorization header against the
/// anchor's own signing secret.
pub struct Auth(pub AuthenticatedAccount);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A layer may already have authenticated the request
        if let Some(account) = parts.extensions.get::<AuthenticatedAccount>().cloned() {
            return Ok(Auth(account));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::InvalidAuthHeader)?;

        let claims = state.auth.tokens().verify(token)?;

        Ok(Auth(AuthenticatedAccount::from_claims(claims)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_state;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = test_state();
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_non_bearer_scheme() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_garbage_token() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Bearer nope"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let state = test_state();
        let mut parts = parts_with_header(None);

        let account = AuthenticatedAccount {
            account_id: "account_from_layer".to_string(),
            token_id: "00".to_string(),
            expires_at: 0,
            issuer: String::new(),
        };
        parts.extensions.insert(account);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.account_id, "account_from_layer");
    }
}
