//! Config-backed tenant store.
//!
//! # Selection
//! A tenant is a candidate when its host (if any) equals the request host
//! and the request path lies under its prefix. Among candidates the order is:
//! host-bound before any-host, longest prefix, the tenant named by the
//! `tenant` cookie, the default tenant, declaration order.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use uuid::Uuid;

use super::model::Tenant;
use super::resolver::TenantLookup;
use super::TenantLookupError;
use crate::routing::canonical::{build_prefix, starts_with_ignore_case};

/// Cookie selecting a tenant among those sharing a prefix.
pub const TENANT_COOKIE: &str = "tenant";

/// Tenant lookup over an in-memory list, swappable on config reload.
pub struct StaticTenantStore {
    tenants: ArcSwap<Vec<Tenant>>,
}

impl StaticTenantStore {
    pub fn new(tenants: Vec<Tenant>) -> Self {
        Self {
            tenants: ArcSwap::from_pointee(tenants),
        }
    }

    /// Replace all tenants atomically.
    pub fn replace(&self, tenants: Vec<Tenant>) {
        tracing::info!(count = tenants.len(), "Tenant store updated");
        self.tenants.store(Arc::new(tenants));
    }

    pub fn len(&self) -> usize {
        self.tenants.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.load().is_empty()
    }

    /// Synchronous selection used by the lookup implementation.
    pub fn find(&self, host: &str, path: &str, cookies: &HashMap<String, String>) -> Option<Tenant> {
        let selected = cookies
            .get(TENANT_COOKIE)
            .and_then(|v| Uuid::parse_str(v.trim()).ok());
        let tenants = self.tenants.load();

        tenants
            .iter()
            .enumerate()
            .filter(|(_, t)| t.host.as_deref().is_none_or(|h| h.eq_ignore_ascii_case(host)))
            .filter_map(|(index, t)| prefix_match_len(t, path).map(|len| (index, t, len)))
            .max_by_key(|(index, t, len)| {
                (
                    t.host.is_some(),
                    *len,
                    Some(t.id) == selected,
                    t.is_default,
                    Reverse(*index),
                )
            })
            .map(|(_, t, _)| t.clone())
    }
}

/// Length of the tenant prefix if `path` lies under it.
fn prefix_match_len(tenant: &Tenant, path: &str) -> Option<usize> {
    let prefix = build_prefix(tenant);
    let bare = prefix.trim_end_matches('/');
    if starts_with_ignore_case(path, &prefix) || path.eq_ignore_ascii_case(bare) {
        Some(bare.len())
    } else {
        None
    }
}

#[async_trait]
impl TenantLookup for StaticTenantStore {
    async fn find_tenant_by_request(
        &self,
        host: &str,
        path: &str,
        cookies: &HashMap<String, String>,
    ) -> Result<Option<Tenant>, TenantLookupError> {
        Ok(self.find(host, path, cookies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(name: &str, host: Option<&str>, base_path: &str) -> Tenant {
        Tenant {
            host: host.map(str::to_string),
            base_path: base_path.to_string(),
            ..Tenant::new(Uuid::new_v4(), name, "eur")
        }
    }

    fn names(store: &StaticTenantStore, host: &str, path: &str) -> Option<String> {
        store.find(host, path, &HashMap::new()).map(|t| t.name)
    }

    #[test]
    fn test_longest_prefix_wins() {
        let store = StaticTenantStore::new(vec![
            tenant("root", None, "/"),
            tenant("en", None, "/en"),
            tenant("en-us", None, "/en/us"),
        ]);
        assert_eq!(names(&store, "shop.test", "/en/us/product/1").as_deref(), Some("en-us"));
        assert_eq!(names(&store, "shop.test", "/en/product/1").as_deref(), Some("en"));
        assert_eq!(names(&store, "shop.test", "/EN").as_deref(), Some("en"));
        assert_eq!(names(&store, "shop.test", "/english").as_deref(), Some("root"));
    }

    #[test]
    fn test_host_bound_tenants() {
        let store = StaticTenantStore::new(vec![
            tenant("any", None, "/"),
            tenant("b2b", Some("b2b.shop.test"), "/"),
        ]);
        assert_eq!(names(&store, "B2B.shop.test", "/").as_deref(), Some("b2b"));
        assert_eq!(names(&store, "www.shop.test", "/").as_deref(), Some("any"));

        let store = StaticTenantStore::new(vec![tenant("b2b", Some("b2b.shop.test"), "/")]);
        assert!(names(&store, "www.shop.test", "/").is_none());
    }

    #[test]
    fn test_cookie_then_default_break_ties() {
        let de = tenant("de", None, "/");
        let fr = Tenant {
            is_default: true,
            ..tenant("fr", None, "/")
        };
        let store = StaticTenantStore::new(vec![de.clone(), fr]);
        assert_eq!(names(&store, "shop.test", "/").as_deref(), Some("fr"));

        let cookies = HashMap::from([(TENANT_COOKIE.to_string(), de.id.to_string())]);
        assert_eq!(store.find("shop.test", "/", &cookies).map(|t| t.name).as_deref(), Some("de"));
    }

    #[test]
    fn test_replace() {
        let store = StaticTenantStore::new(vec![]);
        assert!(names(&store, "shop.test", "/").is_none());
        store.replace(vec![tenant("root", None, "/")]);
        assert_eq!(store.len(), 1);
        assert_eq!(names(&store, "shop.test", "/").as_deref(), Some("root"));
    }
}
