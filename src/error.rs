//! Router-level error definitions.
//!
//! Every failure the router can surface is a [`RoutingError`]. The HTTP layer
//! decides how each kind maps onto a response; the router never formats one.

use thiserror::Error;

use crate::routing::loader::RouteSourceError;
use crate::seo::SeoLookupError;
use crate::tenant::TenantLookupError;

/// Errors produced while dispatching requests or generating URLs.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Generation was asked for a route name the table does not contain.
    #[error("Route \"{0}\" does not exist")]
    RouteNotFound(String),

    /// No route pattern matches the canonical path.
    #[error("No route found for \"{method} {path}\"")]
    NoMatch { method: String, path: String },

    /// A pattern matches the path but none of its routes accept the method.
    #[error("Method \"{method}\" not allowed for \"{path}\" (allowed: {})", allowed.join(", "))]
    MethodNotAllowed {
        method: String,
        path: String,
        allowed: Vec<String>,
    },

    /// The tenant lookup collaborator itself failed.
    #[error("Tenant resolution failed: {0}")]
    TenantResolution(#[from] TenantLookupError),

    /// The SEO resolution collaborator failed.
    #[error("SEO resolution failed: {0}")]
    Seo(#[from] SeoLookupError),

    /// A declarative route source exists but could not be loaded.
    #[error(transparent)]
    RouteSource(#[from] RouteSourceError),

    /// A route pattern could not be compiled.
    #[error("Invalid pattern for route \"{route}\": {reason}")]
    InvalidPattern { route: String, reason: String },

    /// Mandatory parameters were not supplied for generation.
    #[error("Missing mandatory parameters for route \"{route}\": {}", missing.join(", "))]
    MissingParameters { route: String, missing: Vec<String> },

    /// A parameter value violates its constraint.
    #[error("Parameter \"{parameter}\" for route \"{route}\" must match \"{requirement}\" (\"{value}\" given)")]
    InvalidParameter {
        route: String,
        parameter: String,
        value: String,
        requirement: String,
    },
}

/// Result type for router operations.
pub type RoutingResult<T> = Result<T, RoutingError>;
