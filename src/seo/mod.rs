//! SEO URL resolution boundary.
//!
//! # Data Flow
//! ```text
//! Inbound:  seo path      → resolve_seo_to_path → canonical path (+ is_canonical)
//! Outbound: canonical path → resolve_path_to_seo → seo path
//! Redirect: canonical path → resolve_url         → current seo path
//! ```
//!
//! # Design Decisions
//! - The storage/lookup engine is external; this module only defines the
//!   capability the router consumes, plus a config-backed store
//! - `None` means "no SEO mapping": the router uses the path as-is

pub mod store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::tenant::LocaleContext;

pub use store::InMemorySeoStore;

/// A mapping between a canonical path and a friendly path for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoUrlRecord {
    pub tenant_id: Uuid,
    /// Tenant-relative canonical path (e.g. `/product/42`).
    pub canonical_path: String,
    /// Friendly path (e.g. `/blue-shoes`).
    pub seo_path: String,
    /// False when the SEO path has been superseded by another one.
    #[serde(default = "default_true")]
    pub is_canonical: bool,
}

fn default_true() -> bool {
    true
}

/// Failure of the SEO resolution collaborator.
#[derive(Debug, Error)]
pub enum SeoLookupError {
    #[error("SEO store unavailable: {0}")]
    Unavailable(String),
}

/// Capability: map between canonical and SEO paths.
#[async_trait]
pub trait SeoResolver: Send + Sync {
    /// Inbound lookup by SEO path.
    async fn resolve_seo_to_path(
        &self,
        tenant_id: Uuid,
        seo_path: &str,
        locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError>;

    /// Outbound lookup by canonical path.
    async fn resolve_path_to_seo(
        &self,
        tenant_id: Uuid,
        canonical_path: &str,
        locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError>;

    /// The current SEO URL for a canonical path, used as redirect target.
    async fn resolve_url(
        &self,
        tenant_id: Uuid,
        canonical_path: &str,
        locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        self.resolve_path_to_seo(tenant_id, canonical_path, locale).await
    }
}
