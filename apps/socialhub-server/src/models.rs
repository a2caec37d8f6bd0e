// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{SiteUser, UserId};

/// Content with named timestamp columns a date filter can target.
pub trait Dated {
    fn date_column(&self, column: &str) -> Option<NaiveDateTime>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub status: PostStatus,
    pub author: UserId,
    /// Site local time.
    pub post_date: NaiveDateTime,
    pub post_date_gmt: NaiveDateTime,
    pub post_modified: NaiveDateTime,
    pub post_modified_gmt: NaiveDateTime,
}

impl Dated for Post {
    fn date_column(&self, column: &str) -> Option<NaiveDateTime> {
        match column {
            "post_date" => Some(self.post_date),
            "post_date_gmt" => Some(self.post_date_gmt),
            "post_modified" => Some(self.post_modified),
            "post_modified_gmt" => Some(self.post_modified_gmt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: u64,
    pub post: u64,
    pub author_name: String,
    pub content: String,
    pub comment_date: NaiveDateTime,
    pub comment_date_gmt: NaiveDateTime,
}

impl Dated for Comment {
    fn date_column(&self, column: &str) -> Option<NaiveDateTime> {
        match column {
            "comment_date" => Some(self.comment_date),
            "comment_date_gmt" => Some(self.comment_date_gmt),
            _ => None,
        }
    }
}

/// The authenticated user as seen by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub roles: Vec<String>,
}

impl From<&SiteUser> for UserResponse {
    fn from(user: &SiteUser) -> Self {
        Self {
            id: user.id,
            name: user.login.clone(),
            roles: user.roles.clone(),
        }
    }
}

/// Payload of the integration page: the token to paste into SocialHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IntegrationToken {
    pub token: String,
    pub user: UserResponse,
    /// Where the token is entered on the SocialHub side.
    pub setup_url: String,
}
