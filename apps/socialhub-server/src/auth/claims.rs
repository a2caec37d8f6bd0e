// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the claims builder used at issuance time.
//!
//! The payload shape is fixed by the partner service:
//!
//! ```json
//! {
//!   "iss": "SocialHub",
//!   "iat": 1700000000,
//!   "plugin": { "version": "1.0.9" },
//!   "site": { "title": "...", "customLogo": null, "version": "6.4", "home": "...", "api": "..." },
//!   "user": { "id": 42, "name": "alice", "roles": ["administrator"] }
//! }
//! ```
//!
//! Only `iss` and `user.id` are checked when a token is presented; everything
//! else is informational for the partner service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Issuer claim identifying tokens minted by this integration.
pub const ISSUER: &str = "SocialHub";

/// Version string embedded in the `plugin` claim.
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Numeric site user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed token payload.
///
/// Everything except `iss` and `user.id` is informational: a value of an
/// unexpected JSON type reads as the field's default instead of failing the
/// decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, deserialize_with = "lenient")]
    pub iss: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub iat: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub plugin: PluginClaims,
    #[serde(default, deserialize_with = "lenient")]
    pub site: SiteClaims,
    #[serde(default, deserialize_with = "lenient")]
    pub user: UserClaims,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginClaims {
    #[serde(default, deserialize_with = "lenient")]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteClaims {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    /// Serialized as `null` when the site has no custom logo.
    #[serde(default, deserialize_with = "lenient")]
    pub custom_logo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient")]
    pub home: String,
    #[serde(default, deserialize_with = "lenient")]
    pub api: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_user_id"
    )]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: Vec<String>,
}

impl Claims {
    /// The user id carried by the token, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.user.id
    }
}

/// Accepts the id as a JSON number or a numeric string. Anything else reads
/// as absent so the authenticator reports it as a missing user id rather
/// than a malformed token.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| match value {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .map(UserId))
}

/// Reads the field as `T`, or `T::default()` when the JSON value has another
/// shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// Epoch seconds as a number or a numeric string; anything else is `0`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

/// Role slugs from a list, or from the values of an object keyed by index
/// (a PHP array whose keys are not sequential). Non-string entries are
/// dropped.
fn deserialize_roles<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let values = match raw {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    };
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(role) => Some(role),
            _ => None,
        })
        .collect())
}

/// The logged-in account a token is minted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SiteUser {
    pub id: UserId,
    pub login: String,
    /// Role slugs in the order the site reports them.
    pub roles: Vec<String>,
}

/// Site metadata copied into the `site` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub title: String,
    pub custom_logo: Option<String>,
    pub platform_version: String,
    pub home_url: String,
    pub api_url: String,
}

/// Assemble the claims for `user`.
///
/// No authorization happens here: the caller is the issuance surface, which
/// is already restricted to logged-in editors. The resulting token carries
/// the user's full privilege set.
pub fn build_claims(
    user: &SiteUser,
    site: &SiteInfo,
    plugin_version: &str,
    issued_at: DateTime<Utc>,
) -> Claims {
    Claims {
        iss: ISSUER.to_string(),
        iat: issued_at.timestamp(),
        plugin: PluginClaims {
            version: plugin_version.to_string(),
        },
        site: SiteClaims {
            title: site.title.clone(),
            custom_logo: site.custom_logo.clone(),
            version: site.platform_version.clone(),
            home: site.home_url.clone(),
            api: site.api_url.clone(),
        },
        user: UserClaims {
            id: Some(user.id),
            name: user.login.clone(),
            roles: user.roles.clone(),
        },
    }
}
