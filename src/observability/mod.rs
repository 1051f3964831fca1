//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Loader, store and router produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (match outcomes, reloads, config size)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Matching emits at `debug`/`trace` only; nothing is logged per request at `info`
//! - Metrics go through the `metrics` facade and are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
