// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request view shared by the pipeline stages.

use std::collections::BTreeMap;
use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, Request, Uri},
};

use crate::auth::UserId;

/// Read-only view of an inbound request (path, headers, query) handed to
/// every pipeline filter.
///
/// Query parameters are decoded once; when a name repeats, the last value wins.
#[derive(Debug, Clone)]
pub struct RestRequest {
    path: String,
    headers: HeaderMap,
    params: BTreeMap<String, String>,
}

impl RestRequest {
    pub fn new(uri: &Uri, headers: HeaderMap) -> Self {
        let params = uri
            .query()
            .map(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            path: uri.path().to_string(),
            headers,
            params,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<B> From<&Request<B>> for RestRequest {
    fn from(request: &Request<B>) -> Self {
        Self::new(request.uri(), request.headers().clone())
    }
}

/// Whether `path` lives under the REST API prefix (`/wp-json` by default).
///
/// Matches whole path segments, so `/wp-jsonx/...` is not a REST path.
pub fn is_rest_path(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return false;
    }
    path.strip_prefix('/')
        .and_then(|rest| rest.strip_prefix(prefix))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Identity resolved for the current request, if any.
///
/// Inserted into request extensions by the pipeline middleware. An upstream
/// layer (a cookie session, say) may insert one first; the pipeline then
/// treats it as already authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentUser(pub Option<UserId>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .unwrap_or_default())
    }
}
