// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Collection query arguments and the parameter schema that validates them.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::ApiError;
use crate::request::RestRequest;

/// Query parameter selecting the column a `before`/`after` filter applies to.
pub const DATE_QUERY_COLUMN: &str = "date_query_column";

pub const BEFORE: &str = "before";
pub const AFTER: &str = "after";
pub const PAGE: &str = "page";
pub const PER_PAGE: &str = "per_page";

const DEFAULT_PER_PAGE: usize = 10;
const MAX_PER_PAGE: usize = 100;

/// A REST collection whose query can be shaped by filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Posts,
    Comments,
}

impl Resource {
    /// Timestamp columns a date filter may target.
    pub fn date_columns(self) -> &'static [&'static str] {
        match self {
            Resource::Posts => &[
                "post_date",
                "post_date_gmt",
                "post_modified",
                "post_modified_gmt",
            ],
            Resource::Comments => &["comment_date", "comment_date_gmt"],
        }
    }

    /// Column used when no filter picks one.
    pub fn default_date_column(self) -> &'static str {
        self.date_columns()[0]
    }
}

/// One clause of a date filter. `column: None` means the resource default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateQuery {
    pub column: Option<String>,
    pub before: Option<NaiveDateTime>,
    pub after: Option<NaiveDateTime>,
}

impl DateQuery {
    pub fn column_or_default(&self, resource: Resource) -> &str {
        self.column
            .as_deref()
            .unwrap_or_else(|| resource.default_date_column())
    }

    /// Both bounds are exclusive.
    pub fn matches(&self, value: NaiveDateTime) -> bool {
        self.before.map_or(true, |before| value < before)
            && self.after.map_or(true, |after| value > after)
    }
}

/// Arguments handed to the content store for a collection read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArgs {
    pub date_query: Vec<DateQuery>,
    pub page: usize,
    pub per_page: usize,
}

impl Default for QueryArgs {
    fn default() -> Self {
        Self {
            date_query: Vec::new(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl QueryArgs {
    /// Build the default arguments from `before`, `after`, `page` and `per_page`.
    pub fn from_request(request: &RestRequest) -> Result<Self, ApiError> {
        let before = request.param(BEFORE).map(|v| parse_date(BEFORE, v)).transpose()?;
        let after = request.param(AFTER).map(|v| parse_date(AFTER, v)).transpose()?;
        let page = parse_count(request, PAGE, 1)?;
        let per_page = parse_count(request, PER_PAGE, DEFAULT_PER_PAGE)?;
        if per_page > MAX_PER_PAGE {
            return Err(ApiError::invalid_param(
                PER_PAGE,
                format!("must be between 1 and {MAX_PER_PAGE}"),
            ));
        }

        let date_query = if before.is_some() || after.is_some() {
            vec![DateQuery {
                column: None,
                before,
                after,
            }]
        } else {
            Vec::new()
        };

        Ok(Self {
            date_query,
            page,
            per_page,
        })
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (site time) or a bare
/// date, which means midnight.
fn parse_date(param: &str, value: &str) -> Result<NaiveDateTime, ApiError> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ApiError::invalid_param(param, "invalid date"))
}

fn parse_count(request: &RestRequest, param: &str, default: usize) -> Result<usize, ApiError> {
    match request.param(param) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ApiError::invalid_param(param, "must be a positive integer")),
    }
}

/// Schema of one declared collection parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSchema {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

impl ParamSchema {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            kind: "string".to_string(),
            enum_values: Vec::new(),
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self {
            kind: "integer".to_string(),
            ..Self::string(description)
        }
    }

    pub fn with_enum(mut self, values: &[&str]) -> Self {
        self.enum_values = values.iter().map(|v| v.to_string()).collect();
        self
    }
}

/// Parameters a collection route declares, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CollectionParams(BTreeMap<String, ParamSchema>);

impl CollectionParams {
    /// Parameters every collection supports.
    pub fn defaults() -> Self {
        let mut params = Self::default();
        params.insert(PAGE, ParamSchema::integer("Current page of the collection."));
        params.insert(
            PER_PAGE,
            ParamSchema::integer("Maximum number of items to be returned in result set."),
        );
        params.insert(
            BEFORE,
            ParamSchema::string(
                "Limit response to items published before a given ISO8601 compliant date.",
            ),
        );
        params.insert(
            AFTER,
            ParamSchema::string(
                "Limit response to items published after a given ISO8601 compliant date.",
            ),
        );
        params
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: ParamSchema) {
        self.0.insert(name.into(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&ParamSchema> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Reject request values outside a declared enum.
    pub fn validate(&self, request: &RestRequest) -> Result<(), ApiError> {
        for (name, value) in request.params() {
            let Some(schema) = self.0.get(name) else {
                continue;
            };
            if !schema.enum_values.is_empty() && !schema.enum_values.iter().any(|v| v == value) {
                return Err(ApiError::invalid_param(
                    name,
                    format!("{name} is not one of {}", schema.enum_values.join(", ")),
                ));
            }
        }
        Ok(())
    }
}
