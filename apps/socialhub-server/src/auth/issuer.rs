// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance for the partner service.

use chrono::{DateTime, Utc};

use super::claims::{build_claims, SiteInfo, SiteUser, PLUGIN_VERSION};
use super::codec::{self, EncodeError, SigningSecret};

/// Mints tokens for logged-in editors.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    secret: SigningSecret,
    site: SiteInfo,
}

impl TokenIssuer {
    pub fn new(secret: SigningSecret, site: SiteInfo) -> Self {
        Self { secret, site }
    }

    /// Sign a token acting as `user`, issued at `now`.
    pub fn issue(&self, user: &SiteUser, now: DateTime<Utc>) -> Result<String, EncodeError> {
        let claims = build_claims(user, &self.site, PLUGIN_VERSION, now);
        codec::encode(&claims, &self.secret)
    }

    pub fn issue_now(&self, user: &SiteUser) -> Result<String, EncodeError> {
        self.issue(user, Utc::now())
    }
}
