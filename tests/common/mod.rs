//! Shared helpers for integration tests.

use std::path::PathBuf;

use edge_router::config::{AppConfig, Pattern, RouteConfig};
use edge_router::Router;

/// Path to a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Build a config from manifest paths and rules.
pub fn config(manifest: &[&str], routes: Vec<RouteConfig>) -> AppConfig {
    AppConfig {
        manifest: manifest.iter().copied().collect(),
        routes,
    }
}

/// Build a router, panicking on invalid input.
#[allow(dead_code)]
pub fn router(manifest: &[&str], routes: Vec<RouteConfig>) -> Router {
    Router::from_config(config(manifest, routes)).expect("valid config")
}

/// The `/blog/<slug>` → `/posts/<slug>.html` rewrite.
pub fn blog_rule() -> RouteConfig {
    RouteConfig::pattern(
        Pattern::new(r"^/blog/(\w+)$").expect("valid pattern"),
        "/posts/$1.html",
    )
}
