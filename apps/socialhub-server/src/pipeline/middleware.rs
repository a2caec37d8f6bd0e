// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum middleware running the user-resolution and pre-dispatch stages.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/wp-json/wp/v2/posts", get(list_posts))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), rest_pipeline))
//!     .with_state(state);
//! ```
//!
//! Handlers read the outcome through the [`CurrentUser`] extractor and the
//! [`RestRequest`] extension.

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::RequestContext;
use crate::request::{is_rest_path, CurrentUser, RestRequest};
use crate::state::AppState;

/// Resolve the user, then gate REST requests on pre-dispatch.
///
/// Each request gets its own [`RequestContext`]. A rejection at pre-dispatch
/// is returned as the response and the route handler never runs.
pub async fn rest_pipeline(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Nested routers see a stripped URI; the prefix check needs the full one.
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    let view = RestRequest::new(&uri, request.headers().clone());
    let mut ctx = RequestContext::new();

    let upstream = request
        .extensions()
        .get::<CurrentUser>()
        .and_then(|user| user.0);
    let user = state
        .registry
        .determine_current_user(upstream, &mut ctx, &view);

    if is_rest_path(view.path(), &state.rest_prefix) {
        if let Err(rejection) = state.registry.rest_pre_dispatch(&mut ctx, &view) {
            return rejection.into_response();
        }
    }

    request.extensions_mut().insert(CurrentUser(user));
    request.extensions_mut().insert(view);
    next.run(request).await
}
