//! Route definitions as declared by route sources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Path parameters, keyed by name.
pub type Params = BTreeMap<String, String>;

/// A single declared route.
///
/// Immutable once loaded; the route table owns the compiled form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Unique route name used for URL generation.
    pub name: String,

    /// Path pattern, e.g. `/product/{id<\d+>}`.
    pub path: String,

    /// Identifier of the handler serving this route.
    pub handler: String,

    /// Allowed HTTP methods. Empty means any method.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Host the request must carry (case-insensitive).
    #[serde(default)]
    pub host: Option<String>,

    /// Default parameter values.
    #[serde(default)]
    pub defaults: Params,

    /// Per-parameter regex constraints.
    #[serde(default)]
    pub requirements: BTreeMap<String, String>,

    #[serde(default)]
    pub options: RouteOptions,
}

/// Behavioural switches for a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteOptions {
    /// Substitute SEO paths when generating URLs for this route.
    #[serde(default)]
    pub seo: bool,
}

impl RouteDefinition {
    pub fn new(name: impl Into<String>, path: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            handler: handler.into(),
            methods: Vec::new(),
            host: None,
            defaults: Params::new(),
            requirements: BTreeMap::new(),
            options: RouteOptions::default(),
        }
    }

    pub fn with_methods(mut self, methods: &[&str]) -> Self {
        self.methods = methods.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn with_requirement(mut self, name: impl Into<String>, regex: impl Into<String>) -> Self {
        self.requirements.insert(name.into(), regex.into());
        self
    }

    /// Mark the route as SEO-enabled.
    pub fn seo(mut self) -> Self {
        self.options.seo = true;
        self
    }
}
