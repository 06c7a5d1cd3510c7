//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes, addresses)
//! - Reject malformed route patterns before they reach the route table
//! - Detect duplicate route names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::{ResourceConfig, RouteConfig, RouterConfig};
use crate::routing::{RouteError, RoutePattern};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("route #{index} has an empty name")]
    EmptyRouteName { index: usize },

    #[error("route name `{name}` is declared more than once")]
    DuplicateRouteName { name: String },

    #[error("route `{route}`: {source}")]
    InvalidPattern {
        route: String,
        #[source]
        source: RouteError,
    },

    #[error("route `{route}`: status {status} is not a valid HTTP status")]
    InvalidStatus { route: String, status: u16 },

    #[error("route `{route}`: static resource declares no responses")]
    NoResponses { route: String },

    #[error("route `{route}`: unknown HTTP method `{method}`")]
    InvalidMethod { route: String, method: String },
}

/// Check `config` for semantic problems.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    errors.extend(validate_routes(&config.routes));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check route declarations on their own.
///
/// Also run by the route table builder, so unvalidated configs never reach it.
pub fn validate_routes(routes: &[RouteConfig]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    for (index, route) in routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName {
                name: route.name.clone(),
            });
        }

        if let Err(source) = route.pattern.parse::<RoutePattern>() {
            errors.push(ValidationError::InvalidPattern {
                route: route.name.clone(),
                source,
            });
        }

        match &route.resource {
            ResourceConfig::Static {
                responses,
                allowed_methods,
                ..
            } => {
                if responses.is_empty() {
                    errors.push(ValidationError::NoResponses {
                        route: route.name.clone(),
                    });
                }
                for method in allowed_methods.iter().flatten() {
                    if method.parse::<Method>().is_err() {
                        errors.push(ValidationError::InvalidMethod {
                            route: route.name.clone(),
                            method: method.clone(),
                        });
                    }
                }
            }
            ResourceConfig::Halt { status, .. } => {
                if !(100..=599).contains(status) {
                    errors.push(ValidationError::InvalidStatus {
                        route: route.name.clone(),
                        status: *status,
                    });
                }
            }
            ResourceConfig::Error { .. } => {}
        }
    }

    errors
}
