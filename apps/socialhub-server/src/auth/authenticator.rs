// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication.
//!
//! Authentication runs in two stages:
//!
//! 1. **User resolution** ([`RequestAuthenticator::determine_user`]) runs for
//!    every request. It never rejects. A bad token is recorded in the
//!    request's [`RequestContext`] and the request continues anonymously.
//! 2. **Pre-dispatch** takes the recorded failure (once) and turns the
//!    request away before it reaches a route handler.
//!
//! Rejecting at stage 1 would block anonymous public reads that happen to
//! carry a stale token.
//!
//! ```text
//! Unchecked ─┬─> NoToken
//!            ├─> MalformedHeader
//!            └─> Extracted ─┬─> DecodeFailed
//!                           └─> Decoded ─┬─> ClaimInvalid
//!                                        └─> Validated(user)
//! ```

use super::claims::{Claims, UserId, ISSUER};
use super::codec::{self, SigningSecret};
use super::extractor::{Extraction, TokenExtractor, TokenSource};
use super::AuthFailure;
use crate::request::{is_rest_path, RestRequest};

/// Where a request is in the authentication state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unchecked,
    NoToken,
    MalformedHeader,
    Extracted(TokenSource),
    DecodeFailed,
    Decoded,
    ClaimInvalid,
    Validated(UserId),
}

impl AuthState {
    fn is_terminal(self) -> bool {
        matches!(
            self,
            AuthState::NoToken
                | AuthState::MalformedHeader
                | AuthState::DecodeFailed
                | AuthState::ClaimInvalid
                | AuthState::Validated(_)
        )
    }
}

/// Authentication state for a single request.
///
/// Create one per request; it is threaded through user resolution and
/// pre-dispatch and dropped with the request.
#[derive(Debug, Default)]
pub struct RequestContext {
    state: AuthState,
    pending_failure: Option<AuthFailure>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// The failure recorded during user resolution, if any.
    pub fn pending_failure(&self) -> Option<&AuthFailure> {
        self.pending_failure.as_ref()
    }

    /// Consume the recorded failure. Later calls return `None`.
    pub fn take_pending_failure(&mut self) -> Option<AuthFailure> {
        self.pending_failure.take()
    }

    fn advance(&mut self, state: AuthState) {
        tracing::trace!(from = ?self.state, to = ?state, "auth state transition");
        self.state = state;
    }
}

/// Verifies tokens on REST requests.
///
/// Holds only immutable configuration and may be shared across requests.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    secret: SigningSecret,
    extractor: TokenExtractor,
    rest_prefix: String,
}

impl RequestAuthenticator {
    pub fn new(
        secret: SigningSecret,
        extractor: TokenExtractor,
        rest_prefix: impl Into<String>,
    ) -> Self {
        Self {
            secret,
            extractor,
            rest_prefix: rest_prefix.into(),
        }
    }

    /// Resolve the user for this request.
    ///
    /// An identity already established by another mechanism is returned
    /// unchanged, as is `current_user` for non-REST requests, requests with
    /// no token, and requests whose token fails (the failure is recorded in
    /// `ctx` instead).
    pub fn determine_user(
        &self,
        ctx: &mut RequestContext,
        request: &RestRequest,
        current_user: Option<UserId>,
    ) -> Option<UserId> {
        if current_user.is_some() {
            return current_user;
        }
        if !is_rest_path(request.path(), &self.rest_prefix) {
            return current_user;
        }
        // Resolution may be asked for more than once per request.
        if ctx.state.is_terminal() {
            return match ctx.state {
                AuthState::Validated(user) => Some(user),
                _ => current_user,
            };
        }

        match self.authenticate(ctx, request) {
            Ok(user) => {
                tracing::debug!(user_id = %user, "token accepted");
                Some(user)
            }
            Err(failure) if failure.is_silent() => current_user,
            Err(failure) => {
                tracing::debug!(
                    code = failure.error_code(),
                    reason = %failure,
                    "token rejected, deferring to pre-dispatch"
                );
                ctx.pending_failure = Some(failure);
                current_user
            }
        }
    }

    /// Run extraction, decoding and claim checks, advancing `ctx` as it goes.
    pub fn authenticate(
        &self,
        ctx: &mut RequestContext,
        request: &RestRequest,
    ) -> Result<UserId, AuthFailure> {
        let token = match self.extractor.extract(request) {
            Ok(Extraction::Found { token, source }) => {
                ctx.advance(AuthState::Extracted(source));
                token
            }
            Ok(Extraction::NotFound) => {
                ctx.advance(AuthState::NoToken);
                return Err(AuthFailure::NoToken);
            }
            Err(failure) => {
                ctx.advance(AuthState::MalformedHeader);
                return Err(failure);
            }
        };

        let claims = match codec::decode(token, &self.secret) {
            Ok(claims) => {
                ctx.advance(AuthState::Decoded);
                claims
            }
            Err(err) => {
                ctx.advance(AuthState::DecodeFailed);
                return Err(err.into());
            }
        };

        match validate_claims(&claims) {
            Ok(user) => {
                ctx.advance(AuthState::Validated(user));
                Ok(user)
            }
            Err(failure) => {
                ctx.advance(AuthState::ClaimInvalid);
                Err(failure)
            }
        }
    }
}

/// Check the claims that make a token a credential: issuer first, then a
/// non-zero user id.
pub fn validate_claims(claims: &Claims) -> Result<UserId, AuthFailure> {
    if claims.iss != ISSUER {
        return Err(AuthFailure::IssuerMismatch);
    }
    match claims.user_id() {
        Some(user) if user.get() != 0 => Ok(user),
        _ => Err(AuthFailure::MissingUserId),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{PluginClaims, SiteClaims, UserClaims};
    use crate::auth::codec::encode;
    use axum::http::Request;

    fn secret(s: &str) -> SigningSecret {
        SigningSecret::new(s).unwrap()
    }

    fn authenticator() -> RequestAuthenticator {
        RequestAuthenticator::new(secret("k1"), TokenExtractor::default(), "wp-json")
    }

    fn claims(iss: &str, user_id: Option<u64>) -> Claims {
        Claims {
            iss: iss.to_string(),
            iat: 1_700_000_000,
            plugin: PluginClaims::default(),
            site: SiteClaims::default(),
            user: UserClaims {
                id: user_id.map(UserId),
                name: "alice".to_string(),
                roles: vec!["administrator".to_string()],
            },
        }
    }

    fn token(claims: &Claims, key: &str) -> String {
        encode(claims, &secret(key)).unwrap()
    }

    fn bearer_request(path: &str, token: &str) -> RestRequest {
        let request = Request::builder()
            .uri(path)
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .unwrap();
        RestRequest::from(&request)
    }

    fn plain_request(uri: &str) -> RestRequest {
        RestRequest::from(&Request::builder().uri(uri).body(()).unwrap())
    }

    #[test]
    fn valid_token_resolves_user() {
        let signed = token(&claims("SocialHub", Some(42)), "k1");
        let request = bearer_request("/wp-json/wp/v2/posts", &signed);
        let mut ctx = RequestContext::new();

        let user = authenticator().determine_user(&mut ctx, &request, None);

        assert_eq!(user, Some(UserId(42)));
        assert_eq!(ctx.state(), AuthState::Validated(UserId(42)));
        assert!(ctx.pending_failure().is_none());
    }

    #[test]
    fn existing_identity_is_never_overridden() {
        let auth = authenticator();
        for signed in [
            token(&claims("SocialHub", Some(42)), "k1"),
            token(&claims("SocialHub", Some(42)), "k2"),
            "garbage".to_string(),
        ] {
            let request = bearer_request("/wp-json/wp/v2/posts", &signed);
            let mut ctx = RequestContext::new();

            let user = auth.determine_user(&mut ctx, &request, Some(UserId(7)));

            assert_eq!(user, Some(UserId(7)));
            assert_eq!(ctx.state(), AuthState::Unchecked);
            assert!(ctx.pending_failure().is_none());
        }
    }

    #[test]
    fn non_rest_requests_are_ignored() {
        let request = bearer_request("/wp-admin/index.php", "garbage");
        let mut ctx = RequestContext::new();

        assert_eq!(authenticator().determine_user(&mut ctx, &request, None), None);
        assert_eq!(ctx.state(), AuthState::Unchecked);
        assert!(ctx.pending_failure().is_none());
    }

    #[test]
    fn no_token_records_nothing() {
        let request = plain_request("/wp-json/wp/v2/posts");
        let mut ctx = RequestContext::new();

        assert_eq!(authenticator().determine_user(&mut ctx, &request, None), None);
        assert_eq!(ctx.state(), AuthState::NoToken);
        assert!(ctx.pending_failure().is_none());
    }

    #[test]
    fn foreign_issuer_is_deferred() {
        let signed = token(&claims("OtherSystem", Some(42)), "k1");
        let request = bearer_request("/wp-json/wp/v2/posts", &signed);
        let mut ctx = RequestContext::new();

        assert_eq!(authenticator().determine_user(&mut ctx, &request, None), None);
        assert_eq!(ctx.state(), AuthState::ClaimInvalid);
        assert_eq!(ctx.pending_failure(), Some(&AuthFailure::IssuerMismatch));
    }

    #[test]
    fn wrong_secret_is_deferred_signature_mismatch() {
        let signed = token(&claims("SocialHub", Some(42)), "k2");
        let request = bearer_request("/wp-json/wp/v2/posts", &signed);
        let mut ctx = RequestContext::new();

        assert_eq!(authenticator().determine_user(&mut ctx, &request, None), None);
        assert_eq!(ctx.state(), AuthState::DecodeFailed);
        assert_eq!(ctx.pending_failure(), Some(&AuthFailure::SignatureMismatch));
    }

    #[test]
    fn malformed_query_token_is_deferred() {
        let request = plain_request("/wp-json/wp/v2/posts?access_token=abc.def.ghi");
        let mut ctx = RequestContext::new();

        assert_eq!(authenticator().determine_user(&mut ctx, &request, None), None);
        assert!(matches!(
            ctx.pending_failure(),
            Some(AuthFailure::MalformedToken(_))
        ));
    }

    #[test]
    fn malformed_header_is_deferred() {
        let request = RestRequest::from(
            &Request::builder()
                .uri("/wp-json/wp/v2/posts")
                .header("Authorization", "Basic dXNlcjpwYXNz")
                .body(())
                .unwrap(),
        );
        let mut ctx = RequestContext::new();

        assert_eq!(authenticator().determine_user(&mut ctx, &request, None), None);
        assert_eq!(ctx.state(), AuthState::MalformedHeader);
        assert_eq!(ctx.pending_failure(), Some(&AuthFailure::MalformedAuthHeader));
    }

    #[test]
    fn pending_failure_is_consumed_once() {
        let request = bearer_request("/wp-json/", &token(&claims("SocialHub", None), "k1"));
        let mut ctx = RequestContext::new();
        authenticator().determine_user(&mut ctx, &request, None);

        assert_eq!(ctx.take_pending_failure(), Some(AuthFailure::MissingUserId));
        assert_eq!(ctx.take_pending_failure(), None);
    }

    #[test]
    fn repeated_resolution_reuses_outcome() {
        let auth = authenticator();
        let request = bearer_request("/wp-json/", &token(&claims("SocialHub", Some(42)), "k1"));
        let mut ctx = RequestContext::new();

        assert_eq!(auth.determine_user(&mut ctx, &request, None), Some(UserId(42)));
        assert_eq!(auth.determine_user(&mut ctx, &request, None), Some(UserId(42)));
    }

    #[test]
    fn issuer_is_checked_before_user_id() {
        assert_eq!(
            validate_claims(&claims("OtherSystem", None)),
            Err(AuthFailure::IssuerMismatch)
        );
        assert_eq!(
            validate_claims(&claims("SocialHub", None)),
            Err(AuthFailure::MissingUserId)
        );
        assert_eq!(
            validate_claims(&claims("SocialHub", Some(0))),
            Err(AuthFailure::MissingUserId)
        );
        assert_eq!(
            validate_claims(&claims("SocialHub", Some(42))),
            Ok(UserId(42))
        );
    }
}
