//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (filesystem hit or pattern rewrite + manifest check)
//!     → Return: Action or NoMatch
//!
//! Rule Compilation (at load):
//!     RouteConfig[]
//!     → Validate shapes
//!     → Compile into Rule variants (regex already compiled by serde)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Rules compiled at load, immutable at runtime
//! - Declaration order is evaluation order
//! - Deterministic: same input always resolves the same way
//! - First match wins

pub mod matcher;
pub mod router;

pub use matcher::{FilesystemRule, Matcher, PatternRule, Rule};
pub use router::{Action, NoMatch, Router};
