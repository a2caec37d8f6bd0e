// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! SocialHub token authentication for the REST API.
//!
//! ## Auth Flow
//!
//! 1. A logged-in editor opens the integration page; the server mints an
//!    HS256 token carrying their user id and roles ([`TokenIssuer`])
//! 2. The editor pastes the token into the SocialHub channel setup
//! 3. SocialHub calls the REST API with `Authorization: Bearer <token>`
//!    (or the forwarded header, or `?access_token=`)
//! 4. The server:
//!    - Verifies the signature against the site secret (HS256 only)
//!    - Checks `iss == "SocialHub"` and that `user.id` is present
//!    - Resolves the request to that user, with their own roles
//!
//! ## Security
//!
//! - Tokens do not expire; rotating the site secret revokes all of them
//! - Any algorithm other than HS256 is refused before verification
//! - A bad token never blocks user resolution; it is rejected at pre-dispatch

pub mod authenticator;
pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod issuer;
pub mod roles;

pub use authenticator::{AuthState, RequestAuthenticator, RequestContext};
pub use claims::{Claims, SiteInfo, SiteUser, UserId, ISSUER, PLUGIN_VERSION};
pub use codec::{DecodeError, SigningSecret};
pub use error::AuthFailure;
pub use extractor::TokenExtractor;
pub use issuer::TokenIssuer;
pub use roles::Role;
