// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{RequestAuthenticator, TokenExtractor, TokenIssuer};
use crate::config::Settings;
use crate::pipeline::{HookRegistry, SocialHubExtension};
use crate::store::ContentStore;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<HookRegistry>,
    pub store: Arc<RwLock<ContentStore>>,
    pub issuer: Arc<TokenIssuer>,
    pub rest_prefix: Arc<str>,
}

impl AppState {
    pub fn new(
        registry: HookRegistry,
        store: ContentStore,
        issuer: TokenIssuer,
        rest_prefix: &str,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            store: Arc::new(RwLock::new(store)),
            issuer: Arc::new(issuer),
            rest_prefix: Arc::from(rest_prefix.trim_matches('/')),
        }
    }

    /// Compose the registry and issuer from configuration.
    pub fn from_settings(settings: &Settings, store: ContentStore) -> Self {
        let authenticator = RequestAuthenticator::new(
            settings.secret.clone(),
            TokenExtractor::new(settings.forwarded_auth_header.clone()),
            settings.rest_prefix.clone(),
        );
        let registry =
            HookRegistry::new().with(Arc::new(SocialHubExtension::new(authenticator)));
        let issuer = TokenIssuer::new(settings.secret.clone(), settings.site.clone());

        Self::new(registry, store, issuer, &settings.rest_prefix)
    }
}
