//! Configuration validation.
//!
//! # Responsibilities
//! - Enforce the two legal rule shapes (filesystem, pattern)
//! - Range-check status codes (200..=499)
//! - Reject headers with an empty key or value
//!
//! # Design Decisions
//! - `validate` short-circuits on the first bad route and returns a bool
//! - `validate_config` returns all validation errors, not just the first
//! - Both are pure functions over `&AppConfig`
//! - Headers on a filesystem rule are accepted; they never reach an action

use thiserror::Error;

use crate::config::schema::{AppConfig, RouteConfig};

/// Lowest status code a pattern rule may set.
pub const MIN_STATUS_CODE: u32 = 200;
/// Highest status code a pattern rule may set.
pub const MAX_STATUS_CODE: u32 = 499;

/// The reason a single route is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteViolation {
    #[error("filesystem rule must not set `{0}`")]
    FilesystemConflict(&'static str),

    #[error("pattern rule is missing `source`")]
    MissingSource,

    #[error("pattern rule is missing `destination`")]
    MissingDestination,

    #[error("pattern rule has an empty `destination`")]
    EmptyDestination,

    #[error("status code {0} is outside 200..=499")]
    StatusCodeOutOfRange(u32),

    #[error("header #{0} has an empty key or value")]
    InvalidHeader(usize),
}

/// A malformed route together with its position in the rule list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("route #{index}: {violation}")]
pub struct ValidationError {
    pub index: usize,
    pub violation: RouteViolation,
}

/// Which legal shape a route has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleShape {
    Filesystem,
    Pattern,
}

/// Classify a route, or report the first thing wrong with it.
pub fn check_route(route: &RouteConfig) -> Result<RuleShape, RouteViolation> {
    if let Some(pos) = route
        .headers
        .iter()
        .flatten()
        .position(|header| !header.is_valid())
    {
        return Err(RouteViolation::InvalidHeader(pos));
    }

    if route.is_filesystem() {
        if route.source.is_some() {
            return Err(RouteViolation::FilesystemConflict("source"));
        }
        if route.destination.is_some() {
            return Err(RouteViolation::FilesystemConflict("destination"));
        }
        if route.status_code.is_some() {
            return Err(RouteViolation::FilesystemConflict("statusCode"));
        }
        return Ok(RuleShape::Filesystem);
    }

    if route.source.is_none() {
        return Err(RouteViolation::MissingSource);
    }
    match route.destination.as_deref() {
        None => return Err(RouteViolation::MissingDestination),
        Some("") => return Err(RouteViolation::EmptyDestination),
        Some(_) => {}
    }
    if let Some(code) = route.status_code {
        if !(MIN_STATUS_CODE..=MAX_STATUS_CODE).contains(&code) {
            return Err(RouteViolation::StatusCodeOutOfRange(code));
        }
    }
    Ok(RuleShape::Pattern)
}

/// Returns true if every route is well formed. An empty rule list is valid.
pub fn validate(config: &AppConfig) -> bool {
    config
        .routes
        .iter()
        .all(|route| check_route(route).is_ok())
}

/// Validate the whole configuration, collecting every malformed route.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = config
        .routes
        .iter()
        .enumerate()
        .filter_map(|(index, route)| {
            check_route(route)
                .err()
                .map(|violation| ValidationError { index, violation })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{Header, Pattern};

    fn blog_rule() -> RouteConfig {
        RouteConfig::pattern(Pattern::new(r"^/blog/(\w+)$").unwrap(), "/posts/$1.html")
    }

    #[test]
    fn test_filesystem_shape() {
        assert_eq!(check_route(&RouteConfig::filesystem()), Ok(RuleShape::Filesystem));

        let mut route = RouteConfig::filesystem();
        route.destination = Some("/x".into());
        assert_eq!(
            check_route(&route),
            Err(RouteViolation::FilesystemConflict("destination"))
        );

        let route = RouteConfig::filesystem().with_status(200);
        assert_eq!(
            check_route(&route),
            Err(RouteViolation::FilesystemConflict("statusCode"))
        );
    }

    #[test]
    fn test_filesystem_rule_with_headers_is_accepted() {
        let route = RouteConfig::filesystem().with_header(Header::new("Cache-Control", "no-cache"));
        assert_eq!(check_route(&route), Ok(RuleShape::Filesystem));
    }

    #[test]
    fn test_pattern_shape() {
        assert_eq!(check_route(&blog_rule()), Ok(RuleShape::Pattern));

        let mut route = blog_rule();
        route.destination = Some(String::new());
        assert_eq!(check_route(&route), Err(RouteViolation::EmptyDestination));

        route.destination = None;
        assert_eq!(check_route(&route), Err(RouteViolation::MissingDestination));

        let mut route = blog_rule();
        route.source = None;
        assert_eq!(check_route(&route), Err(RouteViolation::MissingSource));
    }

    #[test]
    fn test_explicit_false_use_filesystem_is_pattern_rule() {
        let mut route = blog_rule();
        route.use_filesystem = Some(false);
        assert_eq!(check_route(&route), Ok(RuleShape::Pattern));
    }

    #[test]
    fn test_inert_rule_is_rejected() {
        assert_eq!(
            check_route(&RouteConfig::default()),
            Err(RouteViolation::MissingSource)
        );
    }

    #[test]
    fn test_status_code_bounds() {
        for ok in [200, 301, 450, 499] {
            assert!(check_route(&blog_rule().with_status(ok)).is_ok(), "{}", ok);
        }
        for bad in [0, 199, 500, 503] {
            assert_eq!(
                check_route(&blog_rule().with_status(bad)),
                Err(RouteViolation::StatusCodeOutOfRange(bad))
            );
        }
    }

    #[test]
    fn test_empty_header_rejected() {
        let route = blog_rule()
            .with_header(Header::new("X-Ok", "1"))
            .with_header(Header::new("X-Empty", ""));
        assert_eq!(check_route(&route), Err(RouteViolation::InvalidHeader(1)));
    }

    #[test]
    fn test_validate_config_collects_all_errors() {
        let config = AppConfig {
            manifest: Default::default(),
            routes: vec![
                RouteConfig::filesystem(),
                blog_rule().with_status(500),
                RouteConfig::default(),
            ],
        };
        assert!(!validate(&config));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].index, 1);
        assert_eq!(errors[1].index, 2);
        assert_eq!(
            errors[0].to_string(),
            "route #1: status code 500 is outside 200..=499"
        );
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate(&config));
        assert!(validate_config(&config).is_ok());
    }
}
