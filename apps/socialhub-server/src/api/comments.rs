// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Extension, Json};

use super::collection_query;
use crate::error::ApiError;
use crate::models::Comment;
use crate::pipeline::Resource;
use crate::request::RestRequest;
use crate::state::AppState;

/// List comments, newest first.
#[utoipa::path(
    get,
    path = "/{prefix}/wp/v2/comments",
    tag = "Comments",
    params(
        ("prefix" = String, Path, description = "REST API prefix, `wp-json` by default"),
        ("page" = Option<usize>, Query, description = "Current page of the collection"),
        ("per_page" = Option<usize>, Query, description = "Items per page (1-100)"),
        ("before" = Option<String>, Query, description = "Only items dated before this ISO8601 date"),
        ("after" = Option<String>, Query, description = "Only items dated after this ISO8601 date"),
        ("date_query_column" = Option<String>, Query, description = "Column `before`/`after` apply to: comment_date, comment_date_gmt"),
    ),
    responses(
        (status = 200, description = "Matching comments", body = Vec<Comment>),
        (status = 400, description = "Invalid parameter", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid SocialHub token", body = crate::error::ErrorBody),
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(request): Extension<RestRequest>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let args = collection_query(&state, Resource::Comments, &request)?;
    let store = state.store.read().await;
    Ok(Json(store.query_comments(&args)))
}
