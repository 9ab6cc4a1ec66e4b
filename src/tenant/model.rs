//! Tenant records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A storefront instance with its own base path, locale and currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,

    /// Display name for logs.
    #[serde(default)]
    pub name: String,

    /// Host the tenant is served on. `None` means any host.
    #[serde(default)]
    pub host: Option<String>,

    /// Virtual base URL (e.g. `/shop/en`). Takes precedence over `base_path`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Installation base path (e.g. `/shop`).
    #[serde(default = "default_base_path")]
    pub base_path: String,

    #[serde(default)]
    pub locale_id: String,

    /// Locale code applied to the request (e.g. `en-GB`).
    #[serde(default = "default_locale_code")]
    pub locale_code: String,

    /// Default currency of the tenant.
    pub currency_id: String,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub fallback_locale_id: String,
}

fn default_base_path() -> String {
    "/".to_string()
}

fn default_locale_code() -> String {
    "en-GB".to_string()
}

impl Tenant {
    /// A root tenant on any host.
    pub fn new(id: Uuid, name: impl Into<String>, currency_id: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            host: None,
            base_url: None,
            base_path: default_base_path(),
            locale_id: String::new(),
            locale_code: default_locale_code(),
            currency_id: currency_id.into(),
            is_default: false,
            fallback_locale_id: String::new(),
        }
    }
}

/// The projection of a tenant handed to SEO lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    pub tenant_id: Uuid,
    pub is_default: bool,
    pub fallback_locale_id: String,
}

impl From<&Tenant> for LocaleContext {
    fn from(tenant: &Tenant) -> Self {
        Self {
            tenant_id: tenant.id,
            is_default: tenant.is_default,
            fallback_locale_id: tenant.fallback_locale_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_tenant() {
        let tenant: Tenant = toml::from_str(
            r#"
            id = "6f1c0e8e-1b7a-4a57-9a52-0f2d1c7f4e11"
            currency_id = "eur"
            "#,
        )
        .unwrap();
        assert_eq!(tenant.base_path, "/");
        assert_eq!(tenant.locale_code, "en-GB");
        assert!(tenant.base_url.is_none());
        assert!(!tenant.is_default);
    }

    #[test]
    fn test_locale_context_projection() {
        let tenant = Tenant {
            is_default: true,
            fallback_locale_id: "locale-en".into(),
            ..Tenant::new(Uuid::new_v4(), "main", "eur")
        };
        let locale = LocaleContext::from(&tenant);
        assert_eq!(locale.tenant_id, tenant.id);
        assert!(locale.is_default);
        assert_eq!(locale.fallback_locale_id, "locale-en");
    }
}
