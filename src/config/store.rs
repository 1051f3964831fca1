//! Atomically swappable holder for the live router.
//!
//! Readers take a snapshot with [`RouterStore::load`]; a reload publishes a
//! whole new `Router`, so a manifest is never paired with another
//! configuration's rules.

use std::ops::Deref;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::routing::{Action, NoMatch, Router};

/// A published router and the generation it was published as.
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    router: Arc<Router>,
}

impl Snapshot {
    /// Number of replacements before this router was published. The initial router is 0.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Deref for Snapshot {
    type Target = Router;

    fn deref(&self) -> &Router {
        &self.router
    }
}

#[derive(Debug)]
pub struct RouterStore {
    current: ArcSwap<Snapshot>,
}

impl RouterStore {
    pub fn new(router: Router) -> Self {
        metrics::record_config_size(router.rules().len(), router.manifest().len());
        Self {
            current: ArcSwap::from_pointee(Snapshot {
                generation: 0,
                router: Arc::new(router),
            }),
        }
    }

    /// Snapshot of the current router and its generation.
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Publish a new router. Returns the generation it was published as.
    pub fn replace(&self, router: Router) -> u64 {
        metrics::record_config_size(router.rules().len(), router.manifest().len());
        let router = Arc::new(router);
        let previous = self.current.rcu(|current| Snapshot {
            generation: current.generation + 1,
            router: router.clone(),
        });
        let generation = previous.generation + 1;
        tracing::info!(generation, "Router configuration swapped");
        generation
    }

    /// Generation of the router currently published.
    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Resolve `path` against the current router.
    pub fn match_route(&self, path: &str) -> Result<Action, NoMatch> {
        self.current.load().match_route(path)
    }
}

impl Default for RouterStore {
    fn default() -> Self {
        Self::new(Router::default())
    }
}
