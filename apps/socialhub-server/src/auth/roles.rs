// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Site roles and the capabilities this service checks.
//!
//! Tokens carry the user's roles as plain slugs. Unknown slugs (custom roles)
//! are kept in the claims but grant nothing here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Built-in site roles, most privileged first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Editor,
    Author,
    Contributor,
    Subscriber,
}

impl Role {
    /// `edit_posts`: required to mint a token and to see unpublished content.
    pub fn can_edit_posts(&self) -> bool {
        !matches!(self, Role::Subscriber)
    }

    /// Parse a role slug (case-insensitive).
    pub fn from_slug(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "administrator" => Some(Role::Administrator),
            "editor" => Some(Role::Editor),
            "author" => Some(Role::Author),
            "contributor" => Some(Role::Contributor),
            "subscriber" => Some(Role::Subscriber),
            _ => None,
        }
    }

    pub fn as_slug(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Editor => "editor",
            Role::Author => "author",
            Role::Contributor => "contributor",
            Role::Subscriber => "subscriber",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_slug())
    }
}

/// Whether any of `roles` grants `edit_posts`.
pub fn can_edit_posts<S: AsRef<str>>(roles: &[S]) -> bool {
    roles
        .iter()
        .filter_map(|r| Role::from_slug(r.as_ref()))
        .any(|r| r.can_edit_posts())
}
