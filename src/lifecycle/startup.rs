//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the tenant and SEO stores from configuration
//! - Assemble the router over a shared route table cache
//! - Apply reloaded configuration without restarting the listener
//!
//! # Design Decisions
//! - Fail fast: a route table that cannot be built at startup is fatal
//! - Stores are swapped in place so in-flight requests keep their snapshot
//! - The cache backend outlives router rebuilds; reload deletes the slot

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::RouterConfig;
use crate::error::RoutingResult;
use crate::routing::{InMemoryCache, RouteTableBuilder, RouteTableCache, StorefrontRouter};
use crate::seo::InMemorySeoStore;
use crate::tenant::{ScopedTenantResolver, StaticTenantStore};

/// Everything the HTTP layer needs to dispatch, swappable on reload.
pub struct RouterServices {
    router: ArcSwap<StorefrontRouter>,
    tenants: Arc<StaticTenantStore>,
    seo: Arc<InMemorySeoStore>,
    cache: Arc<InMemoryCache>,
}

impl RouterServices {
    pub fn from_config(config: &RouterConfig) -> Self {
        let tenants = Arc::new(StaticTenantStore::new(config.tenants.clone()));
        let seo = Arc::new(InMemorySeoStore::new(config.seo_urls.clone()));
        let cache = Arc::new(InMemoryCache::new());
        let router = build_router(config, &tenants, &seo, &cache);

        tracing::info!(
            tenants = tenants.len(),
            seo_urls = seo.len(),
            "Router services initialized"
        );

        Self {
            router: ArcSwap::from_pointee(router),
            tenants,
            seo,
            cache,
        }
    }

    /// The current router.
    pub fn router(&self) -> Arc<StorefrontRouter> {
        self.router.load_full()
    }

    pub fn tenants(&self) -> &Arc<StaticTenantStore> {
        &self.tenants
    }

    pub fn seo(&self) -> &Arc<InMemorySeoStore> {
        &self.seo
    }

    /// Build and cache the route table, returning the number of routes.
    pub fn warm_up(&self) -> RoutingResult<usize> {
        Ok(self.router().route_table()?.len())
    }

    /// Apply a reloaded configuration.
    pub fn apply(&self, config: &RouterConfig) {
        self.tenants.replace(config.tenants.clone());
        self.seo.replace(config.seo_urls.clone());

        let old = self.router.swap(Arc::new(build_router(
            config,
            &self.tenants,
            &self.seo,
            &self.cache,
        )));
        old.invalidate_routes();
        self.router().invalidate_routes();

        tracing::info!(
            tenants = self.tenants.len(),
            seo_urls = self.seo.len(),
            "Configuration applied"
        );
    }
}

fn build_router(
    config: &RouterConfig,
    tenants: &Arc<StaticTenantStore>,
    seo: &Arc<InMemorySeoStore>,
    cache: &Arc<InMemoryCache>,
) -> StorefrontRouter {
    let builder = RouteTableBuilder::new(
        config.routing.resource.clone(),
        config.routing.handler_dirs.clone(),
    );
    let routes = RouteTableCache::new(cache.clone(), builder).with_key(config.routing.cache_key.clone());

    StorefrontRouter::new(
        routes,
        Arc::new(ScopedTenantResolver::new(tenants.clone())),
        seo.clone(),
    )
    .with_homepage_route(config.routing.homepage_route.clone())
}
