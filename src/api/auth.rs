// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge and token endpoints.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::{
    auth::{Auth, AuthenticateError, AuthenticatedAccount},
    challenge::ChallengeError,
    error::ApiError,
    models::{ChallengeResponse, ErrorResponse, FailureDetail, TokenResponse, TransactionRequest},
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ChallengeQuery {
    /// Account ID (G...) requesting authentication
    pub account: Option<String>,
}

#[utoipa::path(
    get,
    path = "/auth",
    params(ChallengeQuery),
    tag = "Auth",
    responses(
        (status = 200, description = "Anchor-signed challenge", body = ChallengeResponse),
        (status = 400, description = "Missing or invalid account", body = ErrorResponse),
        (status = 500, description = "Challenge could not be built", body = ErrorResponse)
    )
)]
pub async fn get_challenge(
    State(state): State<AppState>,
    Query(params): Query<ChallengeQuery>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let account = params
        .account
        .filter(|account| !account.is_empty())
        .ok_or_else(|| ApiError::bad_request("account is a required query parameter"))?;

    let transaction = state.auth.issue_challenge(&account).map_err(|e| match e {
        ChallengeError::InvalidAccountId(_) | ChallengeError::ClientIsAnchor => {
            ApiError::bad_request("account id is invalid")
        }
        other => {
            tracing::error!(error = %other, "Failed to issue challenge");
            ApiError::internal()
        }
    })?;

    Ok(Json(ChallengeResponse { transaction }))
}

#[utoipa::path(
    post,
    path = "/auth",
    request_body = TransactionRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Challenge accepted", body = TokenResponse),
        (status = 400, description = "Challenge rejected", body = ErrorResponse),
        (status = 500, description = "Internal failure", body = ErrorResponse)
    )
)]
pub async fn post_challenge(
    State(state): State<AppState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let transaction = payload
        .ok()
        .and_then(|Json(request)| request.transaction)
        .filter(|transaction| !transaction.is_empty())
        .ok_or_else(|| {
            ApiError::bad_request("bad request")
                .with_errors(json!({ "transaction": ["the transaction field is required"] }))
        })?;

    let issued = state
        .auth
        .authenticate(&transaction)
        .map_err(authenticate_error)?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

fn authenticate_error(err: AuthenticateError) -> ApiError {
    if err.is_internal() {
        tracing::error!(error = %err, "Failed to authenticate challenge");
        return ApiError::internal();
    }
    match err {
        AuthenticateError::Rejected(failures) => ApiError::bad_request("challenge validation failed")
            .with_errors(
                failures
                    .into_iter()
                    .map(FailureDetail::from)
                    .collect::<Vec<_>>(),
            ),
        other => ApiError::bad_request(other.to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account behind the bearer token", body = AuthenticatedAccount),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn get_session(Auth(account): Auth) -> Json<AuthenticatedAccount> {
    Json(account)
}
