// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Locates a candidate token on an inbound request.
//!
//! Search order, first match wins:
//!
//! 1. `Authorization: Bearer <token>`
//! 2. The forwarded copy of that header set by some reverse proxies
//! 3. `?access_token=<token>`
//!
//! A header with an empty value counts as absent. A non-empty header that is
//! not `Bearer <token>` is an error and does not fall through to the query
//! parameter.

use axum::http::{header::AUTHORIZATION, HeaderName};

use super::AuthFailure;
use crate::request::RestRequest;

/// Query parameter carrying the token directly.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Forwarded Authorization header name used when none is configured.
pub const DEFAULT_FORWARDED_AUTH_HEADER: &str = "x-forwarded-authorization";

const BEARER_PREFIX: &str = "Bearer ";

/// Where a candidate token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    AuthorizationHeader,
    ForwardedHeader,
    QueryParameter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<'r> {
    Found { token: &'r str, source: TokenSource },
    NotFound,
}

#[derive(Debug, Clone)]
pub struct TokenExtractor {
    forwarded_header: HeaderName,
}

impl Default for TokenExtractor {
    fn default() -> Self {
        Self::new(HeaderName::from_static(DEFAULT_FORWARDED_AUTH_HEADER))
    }
}

impl TokenExtractor {
    pub fn new(forwarded_header: HeaderName) -> Self {
        Self { forwarded_header }
    }

    /// Find the candidate token.
    ///
    /// Returns [`AuthFailure::MalformedAuthHeader`] when the winning header is
    /// present but not a bearer credential.
    pub fn extract<'r>(&self, request: &'r RestRequest) -> Result<Extraction<'r>, AuthFailure> {
        let headers = [
            (&AUTHORIZATION, TokenSource::AuthorizationHeader),
            (&self.forwarded_header, TokenSource::ForwardedHeader),
        ];

        for (name, source) in headers {
            let Some(value) = request.headers().get(name) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let value = value
                .to_str()
                .map_err(|_| AuthFailure::MalformedAuthHeader)?;
            let token = parse_bearer(value).ok_or(AuthFailure::MalformedAuthHeader)?;
            return Ok(Extraction::Found { token, source });
        }

        match request.param(ACCESS_TOKEN_PARAM) {
            Some(token) if !token.is_empty() => Ok(Extraction::Found {
                token,
                source: TokenSource::QueryParameter,
            }),
            _ => Ok(Extraction::NotFound),
        }
    }
}

/// Take the first whitespace-delimited word after `Bearer `.
fn parse_bearer(value: &str) -> Option<&str> {
    value
        .strip_prefix(BEARER_PREFIX)?
        .split_whitespace()
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn request(uri: &str, headers: &[(&str, &str)]) -> RestRequest {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        RestRequest::from(&builder.body(()).unwrap())
    }

    fn extract(request: &RestRequest) -> Result<Extraction<'_>, AuthFailure> {
        TokenExtractor::default().extract(request)
    }

    #[test]
    fn nothing_is_not_found() {
        let req = request("/wp-json/wp/v2/posts", &[]);
        assert_eq!(extract(&req), Ok(Extraction::NotFound));
    }

    #[test]
    fn bearer_header() {
        let req = request("/wp-json/", &[("Authorization", "Bearer abc.def.ghi")]);
        assert_eq!(
            extract(&req),
            Ok(Extraction::Found {
                token: "abc.def.ghi",
                source: TokenSource::AuthorizationHeader
            })
        );
    }

    #[test]
    fn header_wins_over_query() {
        let req = request(
            "/wp-json/?access_token=from-query",
            &[("Authorization", "Bearer from-header")],
        );
        assert_eq!(
            extract(&req),
            Ok(Extraction::Found {
                token: "from-header",
                source: TokenSource::AuthorizationHeader
            })
        );
    }

    #[test]
    fn forwarded_header_used_when_authorization_absent() {
        let req = request(
            "/wp-json/?access_token=from-query",
            &[("X-Forwarded-Authorization", "Bearer forwarded")],
        );
        assert_eq!(
            extract(&req),
            Ok(Extraction::Found {
                token: "forwarded",
                source: TokenSource::ForwardedHeader
            })
        );
    }

    #[test]
    fn custom_forwarded_header_name() {
        let extractor = TokenExtractor::new(HeaderName::from_static("redirect-http-authorization"));
        let req = request("/wp-json/", &[("Redirect-Http-Authorization", "Bearer tok")]);
        assert_eq!(
            extractor.extract(&req),
            Ok(Extraction::Found {
                token: "tok",
                source: TokenSource::ForwardedHeader
            })
        );
    }

    #[test]
    fn query_parameter() {
        let req = request("/wp-json/?access_token=abc.def.ghi", &[]);
        assert_eq!(
            extract(&req),
            Ok(Extraction::Found {
                token: "abc.def.ghi",
                source: TokenSource::QueryParameter
            })
        );
    }

    #[test]
    fn empty_query_parameter_is_not_found() {
        let req = request("/wp-json/?access_token=", &[]);
        assert_eq!(extract(&req), Ok(Extraction::NotFound));
    }

    #[test]
    fn malformed_header_does_not_fall_back_to_query() {
        let req = request(
            "/wp-json/?access_token=from-query",
            &[("Authorization", "Basic dXNlcjpwYXNz")],
        );
        assert_eq!(extract(&req), Err(AuthFailure::MalformedAuthHeader));
    }

    #[test]
    fn empty_header_falls_through_to_query() {
        let req = request("/wp-json/?access_token=from-query", &[("Authorization", "")]);
        assert_eq!(
            extract(&req),
            Ok(Extraction::Found {
                token: "from-query",
                source: TokenSource::QueryParameter
            })
        );
    }

    #[test]
    fn bearer_without_token_is_malformed() {
        for value in ["Bearer", "Bearer ", "Bearer    ", "bearer abc", "Token abc"] {
            let req = request("/wp-json/", &[("Authorization", value)]);
            assert_eq!(
                extract(&req),
                Err(AuthFailure::MalformedAuthHeader),
                "header {value:?}"
            );
        }
    }

    #[test]
    fn bearer_takes_first_word() {
        assert_eq!(parse_bearer("Bearer   tok trailing"), Some("tok"));
        assert_eq!(parse_bearer("Bearer tok"), Some("tok"));
    }
}
