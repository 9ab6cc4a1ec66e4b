//! Tenant resolution for a request.
//!
//! Provides the [`TenantResolver`] capability and [`ScopedTenantResolver`],
//! which reuses a tenant already resolved for the logical request before
//! asking the [`TenantLookup`] collaborator.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::model::Tenant;
use super::TenantLookupError;
use crate::http::request::InboundRequest;
use crate::routing::context::RequestContext;

/// External tenant store lookup.
#[async_trait]
pub trait TenantLookup: Send + Sync {
    /// Find the tenant serving a request, or `None` for platform routes.
    async fn find_tenant_by_request(
        &self,
        host: &str,
        path: &str,
        cookies: &HashMap<String, String>,
    ) -> Result<Option<Tenant>, TenantLookupError>;
}

/// Capability: determine the active tenant of a request.
#[async_trait]
pub trait TenantResolver: Send + Sync {
    async fn resolve(
        &self,
        ctx: &RequestContext,
        request: &InboundRequest,
    ) -> Result<Option<Arc<Tenant>>, TenantLookupError>;
}

/// Resolves through the request scope first, then the lookup collaborator.
pub struct ScopedTenantResolver {
    lookup: Arc<dyn TenantLookup>,
}

impl ScopedTenantResolver {
    pub fn new(lookup: Arc<dyn TenantLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl TenantResolver for ScopedTenantResolver {
    async fn resolve(
        &self,
        ctx: &RequestContext,
        request: &InboundRequest,
    ) -> Result<Option<Arc<Tenant>>, TenantLookupError> {
        if let Some(tenant) = ctx.scope().tenant() {
            tracing::trace!(tenant = %tenant.id, "Reusing tenant of logical request");
            return Ok(Some(tenant));
        }

        let found = self
            .lookup
            .find_tenant_by_request(&request.host, &request.path, &request.cookies)
            .await?;

        Ok(found.map(|tenant| {
            tracing::debug!(
                tenant = %tenant.id,
                name = %tenant.name,
                host = %request.host,
                "Tenant resolved"
            );
            ctx.scope().remember_tenant(Arc::new(tenant))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CountingLookup {
        tenant: Option<Tenant>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TenantLookup for CountingLookup {
        async fn find_tenant_by_request(
            &self,
            _host: &str,
            _path: &str,
            _cookies: &HashMap<String, String>,
        ) -> Result<Option<Tenant>, TenantLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.tenant.clone())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl TenantLookup for FailingLookup {
        async fn find_tenant_by_request(
            &self,
            _host: &str,
            _path: &str,
            _cookies: &HashMap<String, String>,
        ) -> Result<Option<Tenant>, TenantLookupError> {
            Err(TenantLookupError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_nested_dispatch_reuses_tenant() {
        let lookup = Arc::new(CountingLookup {
            tenant: Some(Tenant::new(Uuid::new_v4(), "main", "eur")),
            calls: AtomicUsize::new(0),
        });
        let resolver = ScopedTenantResolver::new(lookup.clone());
        let request = InboundRequest::new(Method::GET, "shop.test", "/");
        let ctx = RequestContext::from_request(&request);

        let first = resolver.resolve(&ctx, &request).await.unwrap().unwrap();
        let nested = ctx.sub_request(Method::GET, "/widgets");
        let second = resolver.resolve(&nested, &request).await.unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);

        // A new logical request starts from scratch.
        let fresh = RequestContext::from_request(&request);
        resolver.resolve(&fresh, &request).await.unwrap();
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_tenant_is_not_an_error() {
        let lookup = Arc::new(CountingLookup {
            tenant: None,
            calls: AtomicUsize::new(0),
        });
        let resolver = ScopedTenantResolver::new(lookup);
        let request = InboundRequest::new(Method::GET, "admin.test", "/api/status");
        let ctx = RequestContext::from_request(&request);

        assert!(resolver.resolve(&ctx, &request).await.unwrap().is_none());
        assert!(ctx.scope().tenant().is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let resolver = ScopedTenantResolver::new(Arc::new(FailingLookup));
        let request = InboundRequest::new(Method::GET, "shop.test", "/");
        let ctx = RequestContext::from_request(&request);

        assert!(matches!(
            resolver.resolve(&ctx, &request).await,
            Err(TenantLookupError::Unavailable(_))
        ));
    }
}
