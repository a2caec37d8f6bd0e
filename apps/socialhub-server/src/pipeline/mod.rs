// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! REST pipeline: extension points, query shaping, and the Axum middleware
//! that drives them.

pub mod adapter;
pub mod hooks;
pub mod middleware;
pub mod query;

pub use adapter::SocialHubExtension;
pub use hooks::{Extension, HookRegistry};
pub use query::{CollectionParams, QueryArgs, Resource};
