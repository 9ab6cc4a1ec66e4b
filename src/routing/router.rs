//! Request dispatch and URL generation facade.
//!
//! # Dispatch
//! ```text
//! Start → TenantResolved → CurrencyResolved → PathCanonicalized
//!       → SeoResolved → Matched
//! ```
//! Without a tenant the raw path is matched directly (platform routes).
//!
//! # Generation
//! ```text
//! route + params → raw path (with active base) → strip prefix
//!     → SEO substitution (seo routes only) → formatted URL
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::error::{RoutingError, RoutingResult};
use crate::http::request::InboundRequest;
use crate::observability::metrics;
use crate::routing::cache::RouteTableCache;
use crate::routing::canonical::{build_prefix, normalize_path, strip_prefix};
use crate::routing::context::RequestContext;
use crate::routing::definition::Params;
use crate::routing::generator::{ContextUrlGenerator, ReferenceType, UrlGenerator};
use crate::routing::matcher::{MatchResult, RouteMatcher};
use crate::routing::table::RouteTable;
use crate::seo::SeoResolver;
use crate::tenant::{resolve_currency, LocaleContext, TenantResolver};

/// Default name of the route `assemble` builds on.
pub const HOMEPAGE_ROUTE: &str = "homepage";

/// Outcome handed to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub matched: MatchResult,
    /// SEO path the client should be redirected to (tenant-relative).
    pub redirect_target: Option<String>,
}

/// Multi-tenant, SEO-aware router.
pub struct StorefrontRouter {
    routes: RouteTableCache,
    tenants: Arc<dyn TenantResolver>,
    seo: Arc<dyn SeoResolver>,
    homepage_route: String,
}

impl StorefrontRouter {
    pub fn new(routes: RouteTableCache, tenants: Arc<dyn TenantResolver>, seo: Arc<dyn SeoResolver>) -> Self {
        Self {
            routes,
            tenants,
            seo,
            homepage_route: HOMEPAGE_ROUTE.to_string(),
        }
    }

    pub fn with_homepage_route(mut self, name: impl Into<String>) -> Self {
        self.homepage_route = name.into();
        self
    }

    /// The compiled route table, built on cache miss.
    pub fn route_table(&self) -> RoutingResult<Arc<RouteTable>> {
        self.routes.get_route_table()
    }

    /// Drop the cached route table.
    pub fn invalidate_routes(&self) {
        self.routes.invalidate();
    }

    /// Dispatch an inbound request to a handler.
    pub async fn dispatch(&self, ctx: &mut RequestContext, request: &InboundRequest) -> RoutingResult<Dispatched> {
        let start = Instant::now();
        let result = self.dispatch_inner(ctx, request).await;

        let outcome = match &result {
            Ok(d) if d.redirect_target.is_some() => "redirect",
            Ok(_) => "matched",
            Err(RoutingError::NoMatch { .. }) => "not_found",
            Err(RoutingError::MethodNotAllowed { .. }) => "method_not_allowed",
            Err(_) => "error",
        };
        metrics::record_dispatch(outcome, start);
        result
    }

    async fn dispatch_inner(&self, ctx: &mut RequestContext, request: &InboundRequest) -> RoutingResult<Dispatched> {
        ctx.redirect_target = None;

        let Some(tenant) = self.tenants.resolve(ctx, request).await? else {
            tracing::debug!(host = %request.host, path = %request.path, "No tenant, matching platform route");
            let path = normalize_path(&request.path);
            let matched = self.match_path(ctx, &path)?;
            return Ok(Dispatched {
                matched,
                redirect_target: None,
            });
        };

        let currency = resolve_currency(ctx, request, &tenant.currency_id);
        tracing::debug!(tenant = %tenant.id, currency = %currency, "Currency resolved");
        ctx.attach_tenant(tenant.clone(), currency);

        let prefix = build_prefix(&tenant);
        let canonical = strip_prefix(&request.path, &prefix);
        tracing::debug!(raw = %request.path, canonical = %canonical, "Path canonicalized");

        let locale = LocaleContext::from(tenant.as_ref());
        let Some(record) = self.seo.resolve_seo_to_path(tenant.id, &canonical, &locale).await? else {
            let matched = self.match_path(ctx, &canonical)?;
            return Ok(Dispatched {
                matched,
                redirect_target: None,
            });
        };

        let resolved = normalize_path(&record.canonical_path);
        tracing::debug!(seo = %canonical, canonical = %resolved, "SEO path resolved");

        if !record.is_canonical {
            let target = self
                .seo
                .resolve_url(tenant.id, &resolved, &locale)
                .await?
                .map(|r| r.seo_path)
                .unwrap_or_else(|| resolved.clone());
            tracing::info!(from = %canonical, to = %target, "Superseded SEO path, redirect required");
            metrics::record_seo_redirect();
            ctx.redirect_target = Some(target);
        }

        let matched = self.match_path(ctx, &resolved)?;
        Ok(Dispatched {
            matched,
            redirect_target: ctx.redirect_target.clone(),
        })
    }

    /// Match an already canonical path.
    pub fn match_path(&self, ctx: &mut RequestContext, path: &str) -> RoutingResult<MatchResult> {
        let path = normalize_path(path);
        ctx.path_info = path.clone();

        let table = self.route_table()?;
        let matched = table.match_path(&path, &ctx.method, &ctx.host)?;
        tracing::debug!(
            route = %matched.route,
            handler = %matched.handler,
            path = %path,
            "Route matched"
        );
        Ok(matched)
    }

    /// Generate a URL, substituting SEO paths for SEO-enabled routes when a
    /// tenant is active.
    pub async fn generate(
        &self,
        ctx: &RequestContext,
        name: &str,
        params: &Params,
        reference_type: ReferenceType,
    ) -> RoutingResult<String> {
        let table = self.route_table()?;
        let generator = ContextUrlGenerator::new(&table, ctx);

        let route = table
            .get(name)
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))?;
        let Some(tenant) = ctx.tenant() else {
            return generator.generate(name, params, reference_type);
        };
        if !route.is_seo() {
            return generator.generate(name, params, reference_type);
        }

        let mut url = generator.resolve(name, params)?;
        let canonical = strip_prefix(&url.path, &build_prefix(tenant));

        let locale = LocaleContext::from(tenant.as_ref());
        if let Some(record) = self.seo.resolve_path_to_seo(tenant.id, &canonical, &locale).await? {
            url.path = format!("{}{}", ctx.base_url, normalize_path(&record.seo_path));
        }

        let formatted = generator.format(&url, reference_type);
        let trimmed = formatted.trim_end_matches('/');
        if trimmed.is_empty() && formatted.starts_with('/') {
            Ok("/".to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    /// Absolute homepage URL of the active tenant joined with `relative`.
    pub fn assemble(&self, ctx: &RequestContext, relative: &str) -> RoutingResult<String> {
        let table = self.route_table()?;
        let base = ContextUrlGenerator::new(&table, ctx).generate(
            &self.homepage_route,
            &Params::new(),
            ReferenceType::AbsoluteUrl,
        )?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            relative.trim_start_matches('/')
        ))
    }
}
