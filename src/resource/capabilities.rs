//! Resource capability map.
//!
//! A resource overrides a small set of named decision hooks. Anything it
//! does not override falls back to [`default_capabilities`]. The list of
//! available media types is never user-supplied: it is derived from the
//! resource's response map.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::http::Request;

/// Predicate evaluated per request.
pub type Decision = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Named decision points consulted by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hook {
    ServiceAvailable,
    AllowedMethods,
    Authorized,
    Allowed,
    Exists,
    AvailableMediaTypes,
}

/// Value of a hook.
#[derive(Clone)]
pub enum Capability {
    Flag(bool),
    Methods(Vec<Method>),
    /// Every method is allowed.
    AnyMethod,
    MediaTypes(Vec<String>),
    Decide(Decision),
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Flag(v) => f.debug_tuple("Flag").field(v).finish(),
            Capability::Methods(v) => f.debug_tuple("Methods").field(v).finish(),
            Capability::AnyMethod => f.write_str("AnyMethod"),
            Capability::MediaTypes(v) => f.debug_tuple("MediaTypes").field(v).finish(),
            Capability::Decide(_) => f.write_str("Decide(..)"),
        }
    }
}

/// Hook values every resource starts from.
pub fn default_capabilities() -> BTreeMap<Hook, Capability> {
    BTreeMap::from([
        (Hook::ServiceAvailable, Capability::Flag(true)),
        (Hook::AllowedMethods, Capability::Methods(vec![Method::GET, Method::HEAD])),
        (Hook::Authorized, Capability::Flag(true)),
        (Hook::Allowed, Capability::Flag(true)),
        (Hook::Exists, Capability::Flag(true)),
    ])
}

/// Resolved capability map of a resource.
#[derive(Debug, Clone)]
pub struct Capabilities {
    hooks: BTreeMap<Hook, Capability>,
}

impl Capabilities {
    /// Defaults, then `overrides`, then the derived media types.
    pub(crate) fn resolve(
        overrides: BTreeMap<Hook, Capability>,
        media_types: Vec<String>,
    ) -> Self {
        let mut hooks = default_capabilities();
        hooks.extend(overrides);
        hooks.insert(Hook::AvailableMediaTypes, Capability::MediaTypes(media_types));
        Self { hooks }
    }

    pub fn get(&self, hook: Hook) -> Option<&Capability> {
        self.hooks.get(&hook)
    }

    /// Evaluate a yes/no hook. Missing or non-boolean hooks count as `true`.
    pub fn decide(&self, hook: Hook, request: &Request) -> bool {
        match self.hooks.get(&hook) {
            Some(Capability::Flag(value)) => *value,
            Some(Capability::Decide(decision)) => decision(request),
            _ => true,
        }
    }

    /// Whether `method` passes the allowed-methods hook.
    pub fn allows_method(&self, method: &Method) -> bool {
        match self.hooks.get(&Hook::AllowedMethods) {
            Some(Capability::AnyMethod) => true,
            _ => self.allowed_methods().contains(method),
        }
    }

    /// Explicitly listed methods; empty under [`Capability::AnyMethod`].
    pub fn allowed_methods(&self) -> &[Method] {
        match self.hooks.get(&Hook::AllowedMethods) {
            Some(Capability::Methods(methods)) => methods,
            _ => &[],
        }
    }

    pub fn media_types(&self) -> &[String] {
        match self.hooks.get(&Hook::AvailableMediaTypes) {
            Some(Capability::MediaTypes(types)) => types,
            _ => &[],
        }
    }
}
