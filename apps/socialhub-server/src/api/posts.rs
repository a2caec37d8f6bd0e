// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post collection endpoint.

use axum::{extract::State, Extension, Json};

use super::collection_query;
use crate::auth::roles::can_edit_posts;
use crate::error::ApiError;
use crate::models::Post;
use crate::pipeline::Resource;
use crate::request::{CurrentUser, RestRequest};
use crate::state::AppState;

/// List posts, newest first.
///
/// Drafts and private posts are only listed for users who can edit posts.
#[utoipa::path(
    get,
    path = "/{prefix}/wp/v2/posts",
    tag = "Posts",
    params(
        ("prefix" = String, Path, description = "REST API prefix, `wp-json` by default"),
        ("page" = Option<usize>, Query, description = "Current page of the collection"),
        ("per_page" = Option<usize>, Query, description = "Items per page (1-100)"),
        ("before" = Option<String>, Query, description = "Only items dated before this ISO8601 date"),
        ("after" = Option<String>, Query, description = "Only items dated after this ISO8601 date"),
        ("date_query_column" = Option<String>, Query, description = "Column `before`/`after` apply to: post_date, post_date_gmt, post_modified, post_modified_gmt"),
    ),
    responses(
        (status = 200, description = "Matching posts", body = Vec<Post>),
        (status = 400, description = "Invalid parameter", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid SocialHub token", body = crate::error::ErrorBody),
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(request): Extension<RestRequest>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let args = collection_query(&state, Resource::Posts, &request)?;

    let store = state.store.read().await;
    let include_unpublished = user
        .and_then(|id| store.user(id))
        .is_some_and(|user| can_edit_posts(&user.roles));

    Ok(Json(store.query_posts(&args, include_unpublished)))
}
