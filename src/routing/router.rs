//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the manifest and compiled rules
//! - Evaluate rules in declaration order for a request path
//! - Return the first resolved action or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) rule scan, first match wins
//! - Explicit NoMatch rather than silent default

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::{AppConfig, Header, Manifest};
use crate::config::validation::{validate_config, ValidationError};
use crate::observability::metrics;
use crate::routing::matcher::{Matcher, Rule};

/// The resolved outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub status_code: u16,
    pub headers: Vec<Header>,
    pub destination: String,
}

/// No rule resolved the requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no route matched the path requested")]
pub struct NoMatch;

/// A validated, compiled configuration ready for matching.
#[derive(Debug, Clone, Default)]
pub struct Router {
    manifest: Manifest,
    rules: Vec<Rule>,
}

impl Router {
    /// Validate and compile a parsed configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, Vec<ValidationError>> {
        validate_config(&config)?;

        let rules = config
            .routes
            .into_iter()
            .enumerate()
            .map(|(index, route)| {
                if route.is_filesystem() && route.headers.as_ref().is_some_and(|h| !h.is_empty()) {
                    tracing::warn!(rule = index, "Headers on a filesystem rule are ignored");
                }
                Rule::try_from(route).map_err(|violation| ValidationError { index, violation })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| vec![e])?;

        Ok(Self {
            manifest: config.manifest,
            rules,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Resolve `path` against the rules in order.
    pub fn match_route(&self, path: &str) -> Result<Action, NoMatch> {
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(action) = rule.resolve(path, &self.manifest) {
                tracing::debug!(
                    path = %path,
                    rule = index,
                    destination = %action.destination,
                    status = action.status_code,
                    "Route matched"
                );
                metrics::record_match(match rule {
                    Rule::Filesystem(_) => metrics::MatchOutcome::Filesystem,
                    Rule::Pattern(_) => metrics::MatchOutcome::Pattern,
                });
                return Ok(action);
            }
        }

        tracing::debug!(path = %path, "No route matched");
        metrics::record_match(metrics::MatchOutcome::NoMatch);
        Err(NoMatch)
    }
}
