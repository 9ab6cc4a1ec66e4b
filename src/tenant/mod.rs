//! Tenant resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (host, path, cookies)
//!     → resolver.rs (request scope already holds a tenant? reuse it)
//!     → TenantLookup collaborator (store.rs for config-backed tenants)
//!     → Tenant or none (platform route)
//!     → currency.rs (active currency cascade)
//! ```
//!
//! # Design Decisions
//! - "No tenant" is a valid outcome, not an error
//! - The resolved tenant is cached in the request scope, never process-wide
//! - Tenants are read-only snapshots for the lifetime of a request

pub mod currency;
pub mod model;
pub mod resolver;
pub mod store;

use thiserror::Error;

pub use currency::{resolve_currency, CURRENCY_COOKIE, CURRENCY_PARAM};
pub use model::{LocaleContext, Tenant};
pub use resolver::{ScopedTenantResolver, TenantLookup, TenantResolver};
pub use store::StaticTenantStore;

/// Failure of the tenant lookup collaborator itself.
#[derive(Debug, Error)]
pub enum TenantLookupError {
    /// The backing store could not be queried.
    #[error("Tenant store unavailable: {0}")]
    Unavailable(String),
}
