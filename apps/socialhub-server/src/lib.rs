// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SocialHub Server - token authentication for a publishing REST API
//!
//! Lets the SocialHub service call a site's REST API as a specific user
//! with a long-lived HS256 bearer token, minted from the site's integration
//! page and signed with the site-wide secret.
//!
//! ## Modules
//!
//! - `auth` - Token claims, codec, extraction, validation, and issuance
//! - `pipeline` - Extension-point registry and the Axum middleware driving it
//! - `api` - Reference REST routes (posts, comments, users/me) and the integration page
//! - `store` - In-memory content store backing the reference routes

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod request;
pub mod state;
pub mod store;
