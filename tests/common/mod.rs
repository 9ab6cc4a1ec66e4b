//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use storefront_router::config::RouterConfig;
use storefront_router::routing::{InMemoryCache, RouteTableBuilder, RouteTableCache, StorefrontRouter};
use storefront_router::seo::{InMemorySeoStore, SeoLookupError, SeoResolver, SeoUrlRecord};
use storefront_router::tenant::{LocaleContext, ScopedTenantResolver, StaticTenantStore, Tenant};

pub const EN_TENANT: Uuid = Uuid::from_u128(0x6f1c0e8e_1b7a_4a57_9a52_0f2d1c7f4e11);

pub const ROUTES: &str = r#"
[[routes]]
name = "homepage"
path = "/"
handler = "storefront.home"
options = { seo = true }

[[routes]]
name = "product_detail"
path = "/product/{id}"
handler = "storefront.product"
options = { seo = true }

[[routes]]
name = "cart"
path = "/cart"
handler = "checkout.cart"
methods = ["GET", "POST"]

[[routes]]
name = "platform_status"
path = "/_status"
handler = "platform.status"
"#;

/// English storefront under `/en`, euro by default.
pub fn en_tenant() -> Tenant {
    Tenant {
        base_path: "/en".to_string(),
        locale_code: "en-GB".to_string(),
        is_default: true,
        ..Tenant::new(EN_TENANT, "english", "eur")
    }
}

pub fn seo_record(canonical: &str, seo: &str, is_canonical: bool) -> SeoUrlRecord {
    SeoUrlRecord {
        tenant_id: EN_TENANT,
        canonical_path: canonical.to_string(),
        seo_path: seo.to_string(),
        is_canonical,
    }
}

/// `/blue-shoes` is current; `/old-name` was superseded by `/new-name`.
pub fn seo_records() -> Vec<SeoUrlRecord> {
    vec![
        seo_record("/product/42", "/blue-shoes", true),
        seo_record("/product/43", "/new-name", true),
        seo_record("/product/43", "/old-name", false),
    ]
}

pub fn write_routes(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("routes.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Configuration over the fixture routes, tenant and SEO records.
pub fn router_config(dir: &Path) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.routing.resource = Some(write_routes(dir, ROUTES));
    config.tenants = vec![en_tenant()];
    config.seo_urls = seo_records();
    config
}

/// SEO resolver that counts every call.
pub struct CountingSeo {
    inner: InMemorySeoStore,
    calls: AtomicUsize,
}

impl CountingSeo {
    pub fn new(records: Vec<SeoUrlRecord>) -> Self {
        Self {
            inner: InMemorySeoStore::new(records),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeoResolver for CountingSeo {
    async fn resolve_seo_to_path(
        &self,
        tenant_id: Uuid,
        seo_path: &str,
        locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_seo_to_path(tenant_id, seo_path, locale).await
    }

    async fn resolve_path_to_seo(
        &self,
        tenant_id: Uuid,
        canonical_path: &str,
        locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_path_to_seo(tenant_id, canonical_path, locale).await
    }

    async fn resolve_url(
        &self,
        tenant_id: Uuid,
        canonical_path: &str,
        locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_url(tenant_id, canonical_path, locale).await
    }
}

/// SEO resolver whose backing store is down.
pub struct UnavailableSeo;

#[async_trait]
impl SeoResolver for UnavailableSeo {
    async fn resolve_seo_to_path(
        &self,
        _tenant_id: Uuid,
        _seo_path: &str,
        _locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        Err(SeoLookupError::Unavailable("connection refused".into()))
    }

    async fn resolve_path_to_seo(
        &self,
        _tenant_id: Uuid,
        _canonical_path: &str,
        _locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        Err(SeoLookupError::Unavailable("connection refused".into()))
    }
}

/// Router over the fixture routes in `dir` with the given SEO resolver.
pub fn router_with_seo(dir: &Path, seo: Arc<dyn SeoResolver>) -> StorefrontRouter {
    let builder = RouteTableBuilder::new(Some(write_routes(dir, ROUTES)), Vec::new());
    let routes = RouteTableCache::new(Arc::new(InMemoryCache::new()), builder);
    let tenants = Arc::new(StaticTenantStore::new(vec![en_tenant()]));
    StorefrontRouter::new(routes, Arc::new(ScopedTenantResolver::new(tenants)), seo)
}

pub fn router(dir: &Path) -> StorefrontRouter {
    router_with_seo(dir, Arc::new(InMemorySeoStore::new(seo_records())))
}
