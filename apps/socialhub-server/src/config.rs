// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`Settings`] loaded from
//! them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SOCIALHUB_AUTH_KEY` | Site secret used to sign and verify tokens | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `REST_URL_PREFIX` | REST API path prefix | `wp-json` |
//! | `SOCIALHUB_FORWARDED_AUTH_HEADER` | Header a reverse proxy copies `Authorization` into | `x-forwarded-authorization` |
//! | `SITE_TITLE` | Site title embedded in tokens | `SocialHub Site` |
//! | `SITE_HOME` | Public home URL | `http://localhost:8080` |
//! | `SITE_LOGO_URL` | Custom logo URL | unset |
//! | `SITE_PLATFORM_VERSION` | Platform version embedded in tokens | `6.4` |
//! | `SEED_ADMIN_LOGIN` | Seed an administrator (id 1) with this login | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::auth::extractor::DEFAULT_FORWARDED_AUTH_HEADER;
use crate::auth::{SigningSecret, SiteInfo};

/// Site-wide signing secret. Rotating it revokes every issued token.
pub const AUTH_KEY_ENV: &str = "SOCIALHUB_AUTH_KEY";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const REST_PREFIX_ENV: &str = "REST_URL_PREFIX";
pub const FORWARDED_AUTH_HEADER_ENV: &str = "SOCIALHUB_FORWARDED_AUTH_HEADER";
pub const SITE_TITLE_ENV: &str = "SITE_TITLE";
pub const SITE_HOME_ENV: &str = "SITE_HOME";
pub const SITE_LOGO_ENV: &str = "SITE_LOGO_URL";
pub const SITE_VERSION_ENV: &str = "SITE_PLATFORM_VERSION";
pub const SEED_ADMIN_LOGIN_ENV: &str = "SEED_ADMIN_LOGIN";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REST_PREFIX: &str = "wp-json";
pub const DEFAULT_SITE_TITLE: &str = "SocialHub Site";
pub const DEFAULT_SITE_HOME: &str = "http://localhost:8080";
pub const DEFAULT_SITE_VERSION: &str = "6.4";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SOCIALHUB_AUTH_KEY must be set to a non-empty value")]
    MissingSecret,
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Without surrounding slashes, e.g. `wp-json`.
    pub rest_prefix: String,
    pub forwarded_auth_header: HeaderName,
    pub secret: SigningSecret,
    pub site: SiteInfo,
    pub log_format: LogFormat,
    /// Login of the administrator (id 1) seeded into the content store.
    pub seed_admin_login: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let secret = get(AUTH_KEY_ENV)
            .and_then(SigningSecret::new)
            .ok_or(ConfigError::MissingSecret)?;

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let rest_prefix = get(REST_PREFIX_ENV)
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_REST_PREFIX.to_string());

        let forwarded_auth_header = match get(FORWARDED_AUTH_HEADER_ENV) {
            Some(raw) => HeaderName::from_bytes(raw.trim().as_bytes()).map_err(|_| {
                ConfigError::Invalid {
                    var: FORWARDED_AUTH_HEADER_ENV,
                    value: raw,
                }
            })?,
            None => HeaderName::from_static(DEFAULT_FORWARDED_AUTH_HEADER),
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        let home_url = get(SITE_HOME_ENV)
            .unwrap_or_else(|| DEFAULT_SITE_HOME.to_string())
            .trim_end_matches('/')
            .to_string();
        let site = SiteInfo {
            title: get(SITE_TITLE_ENV).unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
            custom_logo: get(SITE_LOGO_ENV),
            platform_version: get(SITE_VERSION_ENV)
                .unwrap_or_else(|| DEFAULT_SITE_VERSION.to_string()),
            api_url: format!("{home_url}/{rest_prefix}/"),
            home_url,
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            rest_prefix,
            forwarded_auth_header,
            secret,
            site,
            log_format,
            seed_admin_login: get(SEED_ADMIN_LOGIN_ENV),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            var: HOST_ENV,
            value: raw,
        })
    }
}
