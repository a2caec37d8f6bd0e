// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Attaches SocialHub token authentication and the `date_query_column`
//! collection parameter to the REST pipeline.

use std::sync::Arc;

use super::hooks::{Extension, HookRegistry, DEFAULT_PRIORITY};
use super::query::{
    CollectionParams, DateQuery, ParamSchema, QueryArgs, Resource, AFTER, BEFORE, DATE_QUERY_COLUMN,
};
use crate::auth::{RequestAuthenticator, RequestContext, UserId};
use crate::error::ApiError;
use crate::request::RestRequest;

/// Runs after the host's own cookie/session resolution.
pub const DETERMINE_USER_PRIORITY: i32 = 30;

#[derive(Debug, Clone)]
pub struct SocialHubExtension {
    authenticator: RequestAuthenticator,
}

impl SocialHubExtension {
    pub fn new(authenticator: RequestAuthenticator) -> Self {
        Self { authenticator }
    }

    pub fn determine_current_user(
        &self,
        user: Option<UserId>,
        ctx: &mut RequestContext,
        request: &RestRequest,
    ) -> Option<UserId> {
        self.authenticator.determine_user(ctx, request, user)
    }

    /// Replay the failure recorded during user resolution, if any.
    pub fn rest_pre_dispatch(
        &self,
        ctx: &mut RequestContext,
        request: &RestRequest,
    ) -> Result<(), ApiError> {
        match ctx.take_pending_failure() {
            Some(failure) => {
                tracing::info!(
                    path = request.path(),
                    code = failure.error_code(),
                    "rejecting REST request with invalid token"
                );
                Err(failure.into())
            }
            None => Ok(()),
        }
    }

    /// Point the first date clause at `date_query_column` when a
    /// `before`/`after` filter is present.
    pub fn rest_query(&self, mut args: QueryArgs, request: &RestRequest) -> QueryArgs {
        if request.param(BEFORE).is_none() && request.param(AFTER).is_none() {
            return args;
        }
        if let Some(column) = request.param(DATE_QUERY_COLUMN) {
            match args.date_query.first_mut() {
                Some(clause) => clause.column = Some(column.to_string()),
                None => args.date_query.push(DateQuery {
                    column: Some(column.to_string()),
                    ..DateQuery::default()
                }),
            }
        }
        args
    }

    /// Declare `date_query_column` for discovery and enum validation.
    pub fn rest_collection_params(
        resource: Resource,
        mut params: CollectionParams,
    ) -> CollectionParams {
        params.insert(
            DATE_QUERY_COLUMN,
            ParamSchema::string("The date query column.").with_enum(resource.date_columns()),
        );
        params
    }
}

impl Extension for SocialHubExtension {
    fn register(self: Arc<Self>, registry: &mut HookRegistry) {
        let this = self.clone();
        registry.add_determine_current_user(DETERMINE_USER_PRIORITY, move |user, ctx, request| {
            this.determine_current_user(user, ctx, request)
        });

        let this = self.clone();
        registry.add_rest_pre_dispatch(DEFAULT_PRIORITY, move |ctx, request| {
            this.rest_pre_dispatch(ctx, request)
        });

        for resource in [Resource::Posts, Resource::Comments] {
            let this = self.clone();
            registry.add_rest_query(resource, DEFAULT_PRIORITY, move |args, request| {
                this.rest_query(args, request)
            });
            registry.add_rest_collection_params(resource, DEFAULT_PRIORITY, move |params| {
                Self::rest_collection_params(resource, params)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{build_claims, tests::sample_site, SiteUser};
    use crate::auth::{codec, SigningSecret, TokenExtractor};
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, Utc};

    fn registry() -> HookRegistry {
        let authenticator = RequestAuthenticator::new(
            SigningSecret::new("k1").unwrap(),
            TokenExtractor::default(),
            "wp-json",
        );
        HookRegistry::new().with(Arc::new(SocialHubExtension::new(authenticator)))
    }

    fn request(uri: &str) -> RestRequest {
        RestRequest::from(&Request::builder().uri(uri).body(()).unwrap())
    }

    fn token_for(id: u64) -> String {
        let user = SiteUser {
            id: UserId(id),
            login: "alice".to_string(),
            roles: vec!["administrator".to_string()],
        };
        let claims = build_claims(&user, &sample_site(), "1.0.9", Utc::now());
        codec::encode(&claims, &SigningSecret::new("k1").unwrap()).unwrap()
    }

    #[test]
    fn valid_token_resolves_and_passes_pre_dispatch() {
        let registry = registry();
        let request = request(&format!("/wp-json/wp/v2/posts?access_token={}", token_for(42)));
        let mut ctx = RequestContext::new();

        let user = registry.determine_current_user(None, &mut ctx, &request);

        assert_eq!(user, Some(UserId(42)));
        assert!(registry.rest_pre_dispatch(&mut ctx, &request).is_ok());
    }

    #[test]
    fn anonymous_request_is_not_rejected() {
        let registry = registry();
        let request = request("/wp-json/wp/v2/posts");
        let mut ctx = RequestContext::new();

        assert_eq!(registry.determine_current_user(None, &mut ctx, &request), None);
        assert!(registry.rest_pre_dispatch(&mut ctx, &request).is_ok());
    }

    #[test]
    fn malformed_query_token_is_rejected_at_pre_dispatch() {
        let registry = registry();
        let request = request("/wp-json/wp/v2/posts?access_token=abc.def.ghi");
        let mut ctx = RequestContext::new();

        assert_eq!(registry.determine_current_user(None, &mut ctx, &request), None);
        let err = registry.rest_pre_dispatch(&mut ctx, &request).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, "socialhub_invalid_token");

        // Replayed once only.
        assert!(registry.rest_pre_dispatch(&mut ctx, &request).is_ok());
    }

    #[test]
    fn date_query_column_rewrites_clause() {
        let registry = registry();
        let request =
            request("/wp-json/wp/v2/posts?before=2024-01-01&date_query_column=post_modified");
        let args = QueryArgs::from_request(&request).unwrap();

        let args = registry.rest_query(Resource::Posts, args, &request);

        assert_eq!(args.date_query.len(), 1);
        assert_eq!(args.date_query[0].column.as_deref(), Some("post_modified"));
        assert_eq!(
            args.date_query[0].before,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn without_column_param_default_is_untouched() {
        let registry = registry();
        let request = request("/wp-json/wp/v2/posts?before=2024-01-01");
        let args = QueryArgs::from_request(&request).unwrap();

        let args = registry.rest_query(Resource::Posts, args, &request);

        assert_eq!(args.date_query[0].column, None);
    }

    #[test]
    fn column_param_without_date_filter_is_ignored() {
        let registry = registry();
        let request = request("/wp-json/wp/v2/comments?date_query_column=comment_date_gmt");
        let args = QueryArgs::from_request(&request).unwrap();

        let args = registry.rest_query(Resource::Comments, args, &request);

        assert!(args.date_query.is_empty());
    }

    #[test]
    fn clause_is_created_when_missing() {
        let extension = SocialHubExtension::new(RequestAuthenticator::new(
            SigningSecret::new("k1").unwrap(),
            TokenExtractor::default(),
            "wp-json",
        ));
        let request = request(
            "/wp-json/wp/v2/comments?after=2024-01-01&date_query_column=comment_date_gmt",
        );

        let args = extension.rest_query(QueryArgs::default(), &request);

        assert_eq!(args.date_query[0].column.as_deref(), Some("comment_date_gmt"));
    }

    #[test]
    fn collection_params_differ_per_resource() {
        let registry = registry();

        let posts = registry.rest_collection_params(Resource::Posts, CollectionParams::defaults());
        let comments =
            registry.rest_collection_params(Resource::Comments, CollectionParams::defaults());

        assert_eq!(
            posts.get(DATE_QUERY_COLUMN).unwrap().enum_values,
            vec!["post_date", "post_date_gmt", "post_modified", "post_modified_gmt"]
        );
        assert_eq!(
            comments.get(DATE_QUERY_COLUMN).unwrap().enum_values,
            vec!["comment_date", "comment_date_gmt"]
        );
        assert!(posts.contains(BEFORE));
    }
}
