//! Per-request routing state.

use std::sync::{Arc, OnceLock};

use axum::http::Method;

use crate::http::request::InboundRequest;
use crate::routing::canonical::{active_base, build_prefix, normalize_path};
use crate::tenant::Tenant;

/// State shared by one logical request and its nested sub-requests.
///
/// Allocated fresh for every inbound request.
#[derive(Debug, Default)]
pub struct RequestScope {
    tenant: OnceLock<Arc<Tenant>>,
}

impl RequestScope {
    pub fn tenant(&self) -> Option<Arc<Tenant>> {
        self.tenant.get().cloned()
    }

    /// Remember the tenant for nested dispatch. The first stored tenant wins.
    pub fn remember_tenant(&self, tenant: Arc<Tenant>) -> Arc<Tenant> {
        self.tenant.get_or_init(|| tenant).clone()
    }
}

/// Mutable routing state for one dispatch.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub scheme: String,
    /// Request host without port.
    pub host: String,
    pub port: Option<u16>,
    /// Active base prepended to generated paths (tenant prefix without
    /// trailing `/`).
    pub base_url: String,
    /// Path currently being matched.
    pub path_info: String,
    pub currency_id: Option<String>,
    pub locale_id: Option<String>,
    pub locale_code: Option<String>,
    /// Set when a superseded SEO path was requested.
    pub redirect_target: Option<String>,
    tenant: Option<Arc<Tenant>>,
    scope: Arc<RequestScope>,
}

impl RequestContext {
    /// Context for a new logical request.
    pub fn new(method: Method, host: impl Into<String>, path: &str) -> Self {
        Self {
            method,
            scheme: "http".to_string(),
            host: host.into(),
            port: None,
            base_url: String::new(),
            path_info: normalize_path(path),
            currency_id: None,
            locale_id: None,
            locale_code: None,
            redirect_target: None,
            tenant: None,
            scope: Arc::new(RequestScope::default()),
        }
    }

    pub fn from_request(request: &InboundRequest) -> Self {
        let mut ctx = Self::new(request.method.clone(), request.host.clone(), &request.path);
        ctx.scheme = request.scheme.clone();
        ctx.port = request.port;
        ctx
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Context for a nested dispatch within the same logical request.
    ///
    /// Shares the request scope and inherits the resolved currency.
    pub fn sub_request(&self, method: Method, path: &str) -> Self {
        Self {
            method,
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            port: self.port,
            base_url: String::new(),
            path_info: normalize_path(path),
            currency_id: self.currency_id.clone(),
            locale_id: None,
            locale_code: None,
            redirect_target: None,
            tenant: None,
            scope: self.scope.clone(),
        }
    }

    pub fn tenant(&self) -> Option<&Arc<Tenant>> {
        self.tenant.as_ref()
    }

    pub fn scope(&self) -> &RequestScope {
        &self.scope
    }

    /// Attach the resolved tenant and currency, and make the tenant prefix
    /// the active base for generation.
    pub fn attach_tenant(&mut self, tenant: Arc<Tenant>, currency_id: String) {
        self.base_url = active_base(&build_prefix(&tenant));
        self.currency_id = Some(currency_id);
        self.locale_id = Some(tenant.locale_id.clone());
        self.locale_code = Some(tenant.locale_code.clone());
        self.tenant = Some(tenant);
    }
}
