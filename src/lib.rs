//! Multi-tenant, SEO-aware storefront request router.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod seo;
pub mod tenant;

pub use config::RouterConfig;
pub use error::{RoutingError, RoutingResult};
pub use http::HttpServer;
pub use lifecycle::{RouterServices, Shutdown};
pub use routing::StorefrontRouter;
