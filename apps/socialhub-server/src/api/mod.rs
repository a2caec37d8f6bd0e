// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{body::Body, http::Request, middleware, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Span;
use utoipa::OpenApi;

use crate::{
    auth::SiteUser,
    error::{ApiError, ErrorBody, ErrorData},
    models::{Comment, IntegrationToken, Post, PostStatus, UserResponse},
    pipeline::{middleware::rest_pipeline, CollectionParams, QueryArgs, Resource},
    request::RestRequest,
    state::AppState,
};

pub mod admin;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

pub fn router(state: AppState) -> Router {
    let rest_routes = Router::new()
        .route("/wp/v2/posts", get(posts::list_posts))
        .route("/wp/v2/comments", get(comments::list_comments))
        .route("/wp/v2/users/me", get(users::get_current_user))
        .fallback(rest_no_route);

    Router::new()
        .nest(&format!("/{}", state.rest_prefix), rest_routes)
        .route("/wp-admin/socialhub", get(admin::integration_token))
        .route("/health", get(health::health_check))
        .route("/api-doc/openapi.json", get(openapi_json))
        .layer(middleware::from_fn_with_state(state.clone(), rest_pipeline))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Request span carrying the path only. The query string can hold an
/// `access_token`, which must never reach the logs.
fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        version = ?request.version()
    )
}

/// Declare, validate, and shape the query for a collection route.
///
/// Parameters declared through `rest_collection_params` are checked against
/// their enums before the query is built; `rest_query` filters then run over
/// the parsed arguments.
pub(crate) fn collection_query(
    state: &AppState,
    resource: Resource,
    request: &RestRequest,
) -> Result<QueryArgs, ApiError> {
    let params = state
        .registry
        .rest_collection_params(resource, CollectionParams::defaults());
    params.validate(request)?;

    let args = QueryArgs::from_request(request)?;
    Ok(state.registry.rest_query(resource, args, request))
}

async fn rest_no_route() -> ApiError {
    ApiError::no_route()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        posts::list_posts,
        comments::list_comments,
        users::get_current_user,
        admin::integration_token,
        health::health_check
    ),
    components(
        schemas(
            Post,
            PostStatus,
            Comment,
            UserResponse,
            SiteUser,
            IntegrationToken,
            ErrorBody,
            ErrorData,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Posts", description = "Post collection"),
        (name = "Comments", description = "Comment collection"),
        (name = "Users", description = "Current user"),
        (name = "Integration", description = "SocialHub token issuance"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;
