//! Route table construction from configuration.
//!
//! Each [`RouteConfig`] becomes a [`Route`] in declaration order. Static
//! resources with `template = true` substitute `{name}` placeholders with
//! the captured path parameter of the same name.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::config::loader::ConfigError;
use crate::config::schema::{ResourceConfig, RouteConfig};
use crate::config::validation::validate_routes;
use crate::http::{Body, Request, Response};
use crate::resource::{
    error_resource, halt_resource_with, make_resource, Capability, Hook, Output, Resource,
    Responder, ResponseMap,
};
use crate::routing::{PathInfo, Route, RoutePattern, RouteTable};

/// Validate `routes` and build their route table.
///
/// Shadowed routes are kept, in order, and logged.
pub fn build_route_table(routes: &[RouteConfig]) -> Result<RouteTable, ConfigError> {
    let errors = validate_routes(routes);
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    let mut table = RouteTable::builder();
    for route in routes {
        let pattern: RoutePattern = route.pattern.parse()?;
        let resource = build_resource(&route.resource)?;
        table = table.push(Route::new(route.name.clone(), pattern, Arc::new(resource)));
    }
    let table = table.build()?;

    for route in table.shadowed() {
        tracing::warn!(
            route = %route.name,
            pattern = %route.pattern,
            "Route follows a catch-all and can never match"
        );
    }
    Ok(table)
}

/// Build the resource a route declaration describes.
pub fn build_resource(config: &ResourceConfig) -> Result<Resource, ConfigError> {
    let resource = match config {
        ResourceConfig::Static {
            responses,
            allowed_methods,
            template,
        } => {
            let mut map = ResponseMap::new();
            for (media_type, body) in responses {
                let responder = if *template {
                    let body = body.clone();
                    Responder::handler(move |req: &Request| {
                        Output::Body(Body::Text(render(&body, &req.path_info)))
                    })
                } else {
                    Responder::from(body.as_str())
                };
                map.insert(media_type.clone(), responder);
            }

            let mut overrides = BTreeMap::new();
            if let Some(methods) = allowed_methods {
                let methods = methods
                    .iter()
                    .map(|m| m.parse::<Method>())
                    .collect::<Result<_, _>>()?;
                overrides.insert(Hook::AllowedMethods, Capability::Methods(methods));
            }
            make_resource(map, overrides)
        }
        ResourceConfig::Halt { status, body } => {
            let status = StatusCode::from_u16(*status)?;
            let mut response = Response::new(status);
            if let Some(body) = body {
                response = response.with_body(body.as_str());
            }
            halt_resource_with(response)
        }
        ResourceConfig::Error { message } => error_resource(message.clone()),
    };
    Ok(resource)
}

/// Replace `{name}` with the captured value; unknown names are left as-is.
fn render(template: &str, path_info: &PathInfo) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| path_info.get(&after[..close]).map(|v| (close, v)));
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
