// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::codec::DecodeError;
use crate::error::ApiError;

/// Outcome of a token check that did not yield a user.
///
/// `NoToken` is the common case (most requests carry no token) and is never
/// reported to the client. Every other variant is recorded during user
/// resolution and replayed once at pre-dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("Authorization token not found.")]
    NoToken,
    #[error("Authorization header malformed.")]
    MalformedAuthHeader,
    #[error("{0}")]
    MalformedToken(String),
    #[error("Signature verification failed")]
    SignatureMismatch,
    #[error("Algorithm not allowed: {0}")]
    AlgorithmNotAllowed(String),
    #[error("The iss does not match this server")]
    IssuerMismatch,
    #[error("User ID not found in the token")]
    MissingUserId,
}

impl AuthFailure {
    /// REST error code reported to the client.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthFailure::NoToken => "socialhub_no_auth_token",
            AuthFailure::MalformedAuthHeader => "socialhub_bad_auth_header",
            AuthFailure::MalformedToken(_)
            | AuthFailure::SignatureMismatch
            | AuthFailure::AlgorithmNotAllowed(_) => "socialhub_invalid_token",
            AuthFailure::IssuerMismatch => "socialhub_bad_iss",
            AuthFailure::MissingUserId => "socialhub_bad_request",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }

    /// Whether this outcome lets the request continue unauthenticated
    /// without anything being recorded.
    pub fn is_silent(&self) -> bool {
        matches!(self, AuthFailure::NoToken)
    }
}

impl From<DecodeError> for AuthFailure {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Malformed(msg) => AuthFailure::MalformedToken(msg),
            DecodeError::SignatureMismatch => AuthFailure::SignatureMismatch,
            DecodeError::AlgorithmNotAllowed(alg) => AuthFailure::AlgorithmNotAllowed(alg),
        }
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        ApiError::new(
            failure.status_code(),
            failure.error_code(),
            failure.to_string(),
        )
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
