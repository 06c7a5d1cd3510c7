//! Route lookup.
//!
//! # Responsibilities
//! - Store declared routes in declaration order
//! - Look up the first route whose pattern matches a token sequence
//! - Return the matched route with its path info, or explicit no-match
//!
//! # Ordering contract
//! Routes are tried strictly in the order they were declared and the first
//! structural match wins. There is no specificity ranking: a catch-all `/*`
//! declared first shadows every route after it. Declare specific routes
//! before general ones.

use std::sync::Arc;

use crate::resource::Resource;
use crate::routing::matcher::{match_tokens, PathInfo};
use crate::routing::pattern::{RouteError, RoutePattern};

/// A declared route.
#[derive(Debug, Clone)]
pub struct Route {
    /// Identifier used in logs and metrics.
    pub name: String,
    pub pattern: RoutePattern,
    pub resource: Arc<Resource>,
}

impl Route {
    pub fn new(name: impl Into<String>, pattern: RoutePattern, resource: Arc<Resource>) -> Self {
        Self {
            name: name.into(),
            pattern,
            resource,
        }
    }
}

/// The winning route for a request.
#[derive(Debug, Clone)]
pub struct Selected<'a> {
    pub route: &'a Route,
    pub path_info: PathInfo,
}

impl Selected<'_> {
    pub fn resource(&self) -> &Arc<Resource> {
        &self.route.resource
    }
}

/// An ordered, immutable table of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route in declaration order that matches `tokens`.
    pub fn select(&self, tokens: &[&str]) -> Option<Selected<'_>> {
        self.routes.iter().find_map(|route| {
            match_tokens(tokens, &route.pattern).map(|result| Selected {
                route,
                path_info: result.path_info,
            })
        })
    }

    /// Routes that can never be selected because a catch-all precedes them.
    pub fn shadowed(&self) -> Vec<&Route> {
        match self.routes.iter().position(|r| r.pattern.is_catch_all()) {
            Some(index) => self.routes[index + 1..].iter().collect(),
            None => Vec::new(),
        }
    }
}

/// Collects route declarations, keeping their order.
///
/// The first malformed pattern is reported by [`RouteTableBuilder::build`].
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
    error: Option<RouteError>,
}

impl RouteTableBuilder {
    /// Declare a route named after its pattern.
    pub fn route(self, pattern: &str, resource: Resource) -> Self {
        self.named_route(pattern, pattern, resource)
    }

    /// Declare a route with an explicit name.
    pub fn named_route(mut self, name: &str, pattern: &str, resource: Resource) -> Self {
        if self.error.is_some() {
            return self;
        }
        match pattern.parse::<RoutePattern>() {
            Ok(pattern) => self.routes.push(Route::new(name, pattern, Arc::new(resource))),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Declare a route from an already-built pattern and shared resource.
    pub fn push(mut self, route: Route) -> Self {
        if self.error.is_none() {
            self.routes.push(route);
        }
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(RouteTable::new(self.routes)),
        }
    }
}
