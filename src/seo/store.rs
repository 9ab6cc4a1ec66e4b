//! Config-backed SEO URL store.

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use uuid::Uuid;

use super::{SeoLookupError, SeoResolver, SeoUrlRecord};
use crate::routing::canonical::normalize_path;
use crate::tenant::LocaleContext;

/// SEO records held in memory, swappable on config reload.
pub struct InMemorySeoStore {
    records: ArcSwap<Vec<SeoUrlRecord>>,
}

impl InMemorySeoStore {
    pub fn new(records: Vec<SeoUrlRecord>) -> Self {
        Self {
            records: ArcSwap::from_pointee(normalized(records)),
        }
    }

    pub fn replace(&self, records: Vec<SeoUrlRecord>) {
        tracing::info!(count = records.len(), "SEO store updated");
        self.records.store(Arc::new(normalized(records)));
    }

    pub fn len(&self) -> usize {
        self.records.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.load().is_empty()
    }

    /// Record for a friendly path (case-insensitive).
    pub fn by_seo_path(&self, tenant_id: Uuid, seo_path: &str) -> Option<SeoUrlRecord> {
        let seo_path = normalize_path(seo_path);
        self.records
            .load()
            .iter()
            .find(|r| r.tenant_id == tenant_id && r.seo_path.eq_ignore_ascii_case(&seo_path))
            .cloned()
    }

    /// Record for a canonical path, preferring the canonical one.
    pub fn by_canonical_path(&self, tenant_id: Uuid, canonical_path: &str) -> Option<SeoUrlRecord> {
        let canonical_path = normalize_path(canonical_path);
        let records = self.records.load();
        let mut candidates = records
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.canonical_path == canonical_path);
        let first = candidates.next()?;
        if first.is_canonical {
            return Some(first.clone());
        }
        Some(candidates.find(|r| r.is_canonical).unwrap_or(first).clone())
    }
}

fn normalized(records: Vec<SeoUrlRecord>) -> Vec<SeoUrlRecord> {
    records
        .into_iter()
        .map(|r| SeoUrlRecord {
            canonical_path: normalize_path(&r.canonical_path),
            seo_path: normalize_path(&r.seo_path),
            ..r
        })
        .collect()
}

#[async_trait]
impl SeoResolver for InMemorySeoStore {
    async fn resolve_seo_to_path(
        &self,
        tenant_id: Uuid,
        seo_path: &str,
        _locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        Ok(self.by_seo_path(tenant_id, seo_path))
    }

    async fn resolve_path_to_seo(
        &self,
        tenant_id: Uuid,
        canonical_path: &str,
        _locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        Ok(self.by_canonical_path(tenant_id, canonical_path))
    }

    async fn resolve_url(
        &self,
        tenant_id: Uuid,
        canonical_path: &str,
        _locale: &LocaleContext,
    ) -> Result<Option<SeoUrlRecord>, SeoLookupError> {
        // A superseded record is never a redirect target.
        Ok(self
            .by_canonical_path(tenant_id, canonical_path)
            .filter(|r| r.is_canonical))
    }
}
