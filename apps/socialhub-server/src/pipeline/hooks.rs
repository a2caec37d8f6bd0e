// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filter registry for the REST request lifecycle.
//!
//! The host owns one [`HookRegistry`], passes it to each [`Extension`] at
//! startup, and runs the named chains while serving requests. Filters run in
//! ascending priority; equal priorities keep registration order.

use std::collections::HashMap;
use std::sync::Arc;

use super::query::{CollectionParams, QueryArgs, Resource};
use crate::auth::{RequestContext, UserId};
use crate::error::ApiError;
use crate::request::RestRequest;

/// Priority used when an extension has no reason to pick one.
pub const DEFAULT_PRIORITY: i32 = 10;

/// `determine_current_user`: may replace the identity resolved so far.
pub type DetermineUserFilter =
    dyn Fn(Option<UserId>, &mut RequestContext, &RestRequest) -> Option<UserId> + Send + Sync;

/// `rest_pre_dispatch`: may turn the request away before routing.
pub type PreDispatchFilter =
    dyn Fn(&mut RequestContext, &RestRequest) -> Result<(), ApiError> + Send + Sync;

/// `rest_{resource}_query`: reshapes collection query arguments.
pub type QueryFilter = dyn Fn(QueryArgs, &RestRequest) -> QueryArgs + Send + Sync;

/// `rest_{resource}_collection_params`: declares collection parameters.
pub type CollectionParamsFilter = dyn Fn(CollectionParams) -> CollectionParams + Send + Sync;

struct Registered<F: ?Sized> {
    priority: i32,
    filter: Box<F>,
}

/// Filters attached to one extension point.
pub struct FilterChain<F: ?Sized> {
    entries: Vec<Registered<F>>,
}

impl<F: ?Sized> Default for FilterChain<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> FilterChain<F> {
    pub fn add(&mut self, priority: i32, filter: Box<F>) {
        let at = self
            .entries
            .iter()
            .position(|entry| entry.priority > priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, Registered { priority, filter });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = &F> {
        self.entries.iter().map(|entry| entry.filter.as_ref())
    }
}

/// Something that attaches filters to the host's extension points.
pub trait Extension: Send + Sync + 'static {
    fn register(self: Arc<Self>, registry: &mut HookRegistry);
}

#[derive(Default)]
pub struct HookRegistry {
    determine_current_user: FilterChain<DetermineUserFilter>,
    rest_pre_dispatch: FilterChain<PreDispatchFilter>,
    rest_query: HashMap<Resource, FilterChain<QueryFilter>>,
    rest_collection_params: HashMap<Resource, FilterChain<CollectionParamsFilter>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `extension` and return the registry for chaining.
    pub fn with<E: Extension>(mut self, extension: Arc<E>) -> Self {
        extension.register(&mut self);
        self
    }

    pub fn add_determine_current_user<F>(&mut self, priority: i32, filter: F)
    where
        F: Fn(Option<UserId>, &mut RequestContext, &RestRequest) -> Option<UserId>
            + Send
            + Sync
            + 'static,
    {
        self.determine_current_user.add(priority, Box::new(filter));
    }

    pub fn add_rest_pre_dispatch<F>(&mut self, priority: i32, filter: F)
    where
        F: Fn(&mut RequestContext, &RestRequest) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.rest_pre_dispatch.add(priority, Box::new(filter));
    }

    pub fn add_rest_query<F>(&mut self, resource: Resource, priority: i32, filter: F)
    where
        F: Fn(QueryArgs, &RestRequest) -> QueryArgs + Send + Sync + 'static,
    {
        self.rest_query
            .entry(resource)
            .or_default()
            .add(priority, Box::new(filter));
    }

    pub fn add_rest_collection_params<F>(&mut self, resource: Resource, priority: i32, filter: F)
    where
        F: Fn(CollectionParams) -> CollectionParams + Send + Sync + 'static,
    {
        self.rest_collection_params
            .entry(resource)
            .or_default()
            .add(priority, Box::new(filter));
    }

    /// Pass `initial` through every `determine_current_user` filter.
    pub fn determine_current_user(
        &self,
        initial: Option<UserId>,
        ctx: &mut RequestContext,
        request: &RestRequest,
    ) -> Option<UserId> {
        self.determine_current_user
            .iter()
            .fold(initial, |user, filter| filter(user, ctx, request))
    }

    /// Run `rest_pre_dispatch` filters; the first rejection wins.
    pub fn rest_pre_dispatch(
        &self,
        ctx: &mut RequestContext,
        request: &RestRequest,
    ) -> Result<(), ApiError> {
        self.rest_pre_dispatch
            .iter()
            .try_for_each(|filter| filter(ctx, request))
    }

    pub fn rest_query(
        &self,
        resource: Resource,
        args: QueryArgs,
        request: &RestRequest,
    ) -> QueryArgs {
        match self.rest_query.get(&resource) {
            Some(chain) => chain.iter().fold(args, |args, filter| filter(args, request)),
            None => args,
        }
    }

    pub fn rest_collection_params(
        &self,
        resource: Resource,
        params: CollectionParams,
    ) -> CollectionParams {
        match self.rest_collection_params.get(&resource) {
            Some(chain) => chain.iter().fold(params, |params, filter| filter(params)),
            None => params,
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("determine_current_user", &self.determine_current_user.len())
            .field("rest_pre_dispatch", &self.rest_pre_dispatch.len())
            .finish_non_exhaustive()
    }
}
