//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, cookies, params)
//!     → router.rs (facade: tenant → currency → canonical path → SEO)
//!     → canonical.rs (strip tenant prefix)
//!     → matcher.rs (evaluate compiled patterns)
//!     → Return: MatchResult or NoMatch / MethodNotAllowed
//!
//! Route Compilation (on cache miss):
//!     loader.rs (declarative resource + handler directories)
//!     → table.rs (compile patterns, first name registration wins)
//!     → cache.rs (shared slot under a fixed key)
//!
//! Generation:
//!     route name + params
//!     → generator.rs (pattern substitution, active base, formatting)
//!     → router.rs (SEO substitution for seo routes)
//! ```
//!
//! # Design Decisions
//! - Route table immutable once built, shared via Arc
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod cache;
pub mod canonical;
pub mod context;
pub mod definition;
pub mod generator;
pub mod loader;
pub mod matcher;
pub mod pattern;
pub mod router;
pub mod table;

pub use cache::{CacheBackend, InMemoryCache, RouteTableCache, RouteTableRead, ROUTE_TABLE_KEY};
pub use context::{RequestContext, RequestScope};
pub use definition::{Params, RouteDefinition, RouteOptions};
pub use generator::{ContextUrlGenerator, ReferenceType, UrlGenerator};
pub use loader::{RouteLoader, RouteTableBuilder, TomlRouteLoader};
pub use matcher::{MatchResult, RouteMatcher};
pub use router::{Dispatched, StorefrontRouter};
pub use table::RouteTable;
