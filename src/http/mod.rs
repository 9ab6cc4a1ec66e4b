//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → request.rs (host, cookies, query and form parameters)
//!     → routing::StorefrontRouter (tenant, currency, SEO, match)
//!     → response.rs (JSON, redirect or error status)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::InboundRequest;
pub use server::HttpServer;
