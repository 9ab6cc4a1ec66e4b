//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (SEO records reference existing tenants)
//! - Validate value ranges and path shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use uuid::Uuid;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate tenant id {0}")]
    DuplicateTenant(Uuid),

    #[error("tenant {tenant}: {field} \"{value}\" must start with '/'")]
    RelativeTenantPath {
        tenant: Uuid,
        field: &'static str,
        value: String,
    },

    #[error("tenant {0}: currency_id must not be empty")]
    MissingCurrency(Uuid),

    #[error("SEO record \"{seo_path}\" references unknown tenant {tenant}")]
    UnknownSeoTenant { tenant: Uuid, seo_path: String },

    #[error("SEO record path \"{0}\" must start with '/'")]
    RelativeSeoPath(String),

    #[error("routing.cache_key must not be empty")]
    EmptyCacheKey,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("invalid metrics address \"{0}\"")]
    MetricsAddress(String),
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut tenant_ids = HashSet::new();
    for tenant in &config.tenants {
        if !tenant_ids.insert(tenant.id) {
            errors.push(ValidationError::DuplicateTenant(tenant.id));
        }
        if !tenant.base_path.starts_with('/') {
            errors.push(ValidationError::RelativeTenantPath {
                tenant: tenant.id,
                field: "base_path",
                value: tenant.base_path.clone(),
            });
        }
        if let Some(base_url) = &tenant.base_url {
            if !base_url.starts_with('/') {
                errors.push(ValidationError::RelativeTenantPath {
                    tenant: tenant.id,
                    field: "base_url",
                    value: base_url.clone(),
                });
            }
        }
        if tenant.currency_id.trim().is_empty() {
            errors.push(ValidationError::MissingCurrency(tenant.id));
        }
    }

    for record in &config.seo_urls {
        if !tenant_ids.contains(&record.tenant_id) {
            errors.push(ValidationError::UnknownSeoTenant {
                tenant: record.tenant_id,
                seo_path: record.seo_path.clone(),
            });
        }
        for path in [&record.seo_path, &record.canonical_path] {
            if !path.starts_with('/') {
                errors.push(ValidationError::RelativeSeoPath(path.clone()));
            }
        }
    }

    if config.routing.cache_key.is_empty() {
        errors.push(ValidationError::EmptyCacheKey);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::SeoUrlRecord;
    use crate::tenant::Tenant;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let id = Uuid::new_v4();
        let mut config = RouterConfig::default();
        config.tenants.push(Tenant::new(id, "a", "eur"));
        config.tenants.push(Tenant {
            base_path: "en".into(),
            ..Tenant::new(id, "b", "")
        });
        config.seo_urls.push(SeoUrlRecord {
            tenant_id: Uuid::new_v4(),
            canonical_path: "/product/1".into(),
            seo_path: "shoes".into(),
            is_canonical: true,
        });
        config.timeouts.request_secs = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateTenant(id)));
        assert!(errors.contains(&ValidationError::MissingCurrency(id)));
        assert!(errors.contains(&ValidationError::RelativeSeoPath("shoes".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::MetricsAddress("nowhere".into())));
        assert_eq!(errors.len(), 7);
    }
}
