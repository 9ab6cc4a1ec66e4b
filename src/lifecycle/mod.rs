//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build stores and router → Warm route table
//!     → Start listener
//!
//! Reload (startup.rs):
//!     Watcher publishes config → Swap stores → Rebuild router
//!     → Invalidate cached route table
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Broadcast → Stop accepting → Drain → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then router, then listener
//! - A route table that fails to build at startup is fatal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
pub use startup::RouterServices;
