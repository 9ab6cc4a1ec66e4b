//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::cache::ROUTE_TABLE_KEY;
use crate::routing::router::HOMEPAGE_ROUTE;
use crate::seo::SeoUrlRecord;
use crate::tenant::Tenant;

/// Root configuration for the storefront router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route sources and cache settings.
    pub routing: RoutingConfig,

    /// Tenant store records.
    pub tenants: Vec<Tenant>,

    /// SEO store records.
    pub seo_urls: Vec<SeoUrlRecord>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Route sources.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Declarative route file. Missing file = no routes from it.
    pub resource: Option<PathBuf>,

    /// Directories whose `*.toml` files declare handler routes.
    pub handler_dirs: Vec<PathBuf>,

    /// Shared cache key of the compiled table.
    pub cache_key: String,

    /// Route used as the tenant homepage by `assemble`.
    pub homepage_route: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            resource: None,
            handler_dirs: Vec::new(),
            cache_key: ROUTE_TABLE_KEY.to_string(),
            homepage_route: HOMEPAGE_ROUTE.to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
