//! Static-asset route resolver.
//!
//! Resolves a request path to a servable artifact by evaluating ordered
//! routing rules against a manifest of known paths.

pub mod config;
pub mod observability;
pub mod routing;

pub use config::{build_config, validate, AppConfig, ConfigError, RouterStore};
pub use routing::{Action, NoMatch, Router};
