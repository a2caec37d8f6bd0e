// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory content store backing the reference REST routes.

use std::collections::BTreeMap;

use crate::auth::{SiteUser, UserId};
use crate::models::{Comment, Dated, Post, PostStatus};
use crate::pipeline::query::{QueryArgs, Resource};

#[derive(Debug, Default)]
pub struct ContentStore {
    users: BTreeMap<UserId, SiteUser>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, user: SiteUser) {
        self.users.insert(user.id, user);
    }

    pub fn user(&self, id: UserId) -> Option<&SiteUser> {
        self.users.get(&id)
    }

    pub fn insert_post(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn insert_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Posts matching `args`, newest first. Unpublished posts only show up
    /// when `include_unpublished` is set.
    pub fn query_posts(&self, args: &QueryArgs, include_unpublished: bool) -> Vec<Post> {
        let visible = self
            .posts
            .iter()
            .filter(|post| include_unpublished || post.status == PostStatus::Publish);
        select(visible, Resource::Posts, args)
    }

    /// Comments matching `args`, newest first.
    pub fn query_comments(&self, args: &QueryArgs) -> Vec<Comment> {
        select(self.comments.iter(), Resource::Comments, args)
    }
}

fn select<'a, T>(items: impl Iterator<Item = &'a T>, resource: Resource, args: &QueryArgs) -> Vec<T>
where
    T: Dated + Clone + 'a,
{
    let default_column = resource.default_date_column();
    let mut matched: Vec<&T> = items
        .filter(|item| {
            args.date_query.iter().all(|clause| {
                item.date_column(clause.column_or_default(resource))
                    .or_else(|| item.date_column(default_column))
                    .is_some_and(|value| clause.matches(value))
            })
        })
        .collect();

    matched.sort_by_key(|item| std::cmp::Reverse(item.date_column(default_column)));

    matched
        .into_iter()
        .skip(args.page.saturating_sub(1).saturating_mul(args.per_page))
        .take(args.per_page)
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pipeline::query::DateQuery;
    use chrono::{NaiveDate, NaiveDateTime};

    pub(crate) fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    /// Post 1: written 2023-12-20, edited 2024-02-01.
    /// Post 2: written and edited 2024-01-15.
    /// Post 3: draft written 2023-11-01.
    pub(crate) fn seeded_store() -> ContentStore {
        let mut store = ContentStore::new();
        store.insert_user(SiteUser {
            id: UserId(1),
            login: "admin".to_string(),
            roles: vec!["administrator".to_string()],
        });
        store.insert_user(SiteUser {
            id: UserId(2),
            login: "reader".to_string(),
            roles: vec!["subscriber".to_string()],
        });
        for (id, status, written, edited) in [
            (1, PostStatus::Publish, at(2023, 12, 20), at(2024, 2, 1)),
            (2, PostStatus::Publish, at(2024, 1, 15), at(2024, 1, 15)),
            (3, PostStatus::Draft, at(2023, 11, 1), at(2023, 11, 1)),
        ] {
            store.insert_post(Post {
                id,
                title: format!("Post {id}"),
                status,
                author: UserId(1),
                post_date: written,
                post_date_gmt: written,
                post_modified: edited,
                post_modified_gmt: edited,
            });
        }
        for (id, date) in [(10, at(2023, 12, 21)), (11, at(2024, 1, 16))] {
            store.insert_comment(Comment {
                id,
                post: 1,
                author_name: "visitor".to_string(),
                content: format!("Comment {id}"),
                comment_date: date,
                comment_date_gmt: date,
            });
        }
        store
    }

    fn before(column: Option<&str>, y: i32, m: u32, d: u32) -> QueryArgs {
        QueryArgs {
            date_query: vec![DateQuery {
                column: column.map(str::to_string),
                before: Some(at(y, m, d)),
                after: None,
            }],
            ..QueryArgs::default()
        }
    }

    fn ids(posts: &[Post]) -> Vec<u64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn published_posts_newest_first() {
        let store = seeded_store();
        assert_eq!(ids(&store.query_posts(&QueryArgs::default(), false)), vec![2, 1]);
        assert_eq!(ids(&store.query_posts(&QueryArgs::default(), true)), vec![2, 1, 3]);
    }

    #[test]
    fn date_filter_uses_default_column() {
        let store = seeded_store();
        let posts = store.query_posts(&before(None, 2024, 1, 1), false);
        assert_eq!(ids(&posts), vec![1]);
    }

    #[test]
    fn date_filter_honours_selected_column() {
        let store = seeded_store();
        let posts = store.query_posts(&before(Some("post_modified"), 2024, 1, 1), false);
        assert!(posts.is_empty());
    }

    #[test]
    fn unknown_column_falls_back_to_default() {
        let store = seeded_store();
        let posts = store.query_posts(&before(Some("menu_order"), 2024, 1, 1), false);
        assert_eq!(ids(&posts), vec![1]);
    }

    #[test]
    fn comments_filter_and_paginate() {
        let store = seeded_store();
        let args = QueryArgs {
            per_page: 1,
            page: 2,
            ..QueryArgs::default()
        };
        let comments = store.query_comments(&args);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, 10);
    }

    #[test]
    fn looks_up_users() {
        let store = seeded_store();
        assert_eq!(store.user(UserId(1)).unwrap().login, "admin");
        assert!(store.user(UserId(99)).is_none());
    }
}
