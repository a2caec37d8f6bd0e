// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Integration page: mints the token an editor pastes into SocialHub.
//!
//! This route lives outside the REST prefix, so SocialHub tokens are never
//! resolved for it. The caller must already be identified by an upstream
//! session layer (a [`CurrentUser`] extension) and hold `edit_posts`.

use axum::{extract::State, Json};

use crate::auth::roles::can_edit_posts;
use crate::error::ApiError;
use crate::models::{IntegrationToken, UserResponse};
use crate::request::CurrentUser;
use crate::state::AppState;

/// Where the token is entered on the SocialHub side.
pub const SETUP_URL: &str = "https://app.socialhub.io/#settings/channels";

/// Issue a token acting as the current user.
#[utoipa::path(
    get,
    path = "/wp-admin/socialhub",
    tag = "Integration",
    responses(
        (status = 200, description = "Freshly issued token", body = IntegrationToken),
        (status = 401, description = "Not logged in", body = crate::error::ErrorBody),
        (status = 403, description = "Missing edit_posts capability", body = crate::error::ErrorBody),
    )
)]
pub async fn integration_token(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<IntegrationToken>, ApiError> {
    let id = user.ok_or_else(ApiError::not_logged_in)?;
    let store = state.store.read().await;
    let user = store.user(id).ok_or_else(ApiError::not_logged_in)?;

    if !can_edit_posts(&user.roles) {
        return Err(ApiError::forbidden("Sorry, you are not allowed to access this page."));
    }

    let token = state.issuer.issue_now(user).map_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "failed to sign integration token");
        ApiError::internal("Failed to issue token")
    })?;

    tracing::info!(user_id = %user.id, "issued SocialHub integration token");

    Ok(Json(IntegrationToken {
        token,
        user: UserResponse::from(user),
        setup_url: SETUP_URL.to_string(),
    }))
}
