// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::models::UserResponse;
use crate::request::CurrentUser;
use crate::state::AppState;

/// Get the user the request resolved to.
///
/// With a SocialHub token this is the user the token was minted for, with
/// that user's own roles.
#[utoipa::path(
    get,
    path = "/{prefix}/wp/v2/users/me",
    tag = "Users",
    params(("prefix" = String, Path, description = "REST API prefix, `wp-json` by default")),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid SocialHub token", body = crate::error::ErrorBody),
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let id = user.ok_or_else(ApiError::not_logged_in)?;
    let store = state.store.read().await;
    let user = store.user(id).ok_or_else(ApiError::not_logged_in)?;
    Ok(Json(user.into()))
}
