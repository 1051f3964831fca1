//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON/TOML)
//!     → loader.rs (parse & deserialize, regex compiled here)
//!     → validation.rs (rule shape checks)
//!     → Router (validated, immutable)
//!     → store.rs publishes a Snapshot (router + generation) to readers
//!
//! On reload:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<Snapshot>
//!     → readers observe new config on their next lookup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - A config with any bad rule is rejected whole
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{build_config, load_config, ConfigError};
pub use schema::{AppConfig, Header, Manifest, Pattern, RouteConfig};
pub use store::{RouterStore, Snapshot};
pub use validation::{validate, validate_config, ValidationError};
