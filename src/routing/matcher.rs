//! Rule matching logic.
//!
//! # Responsibilities
//! - Compile a validated `RouteConfig` into a `Rule`
//! - Filesystem rules: serve the request path if it is in the manifest
//! - Pattern rules: rewrite via regex substitution, serve if the result is in the manifest
//!
//! # Design Decisions
//! - A rule is a sum type; invalid field combinations cannot be represented
//! - Patterns are searched, not anchored, unless the pattern anchors itself
//! - Manifest lookups are exact, no path normalization

use std::fmt;

use crate::config::schema::{Header, Manifest, Pattern, RouteConfig};
use crate::config::validation::{check_route, RouteViolation, RuleShape};
use crate::routing::router::Action;

/// Default status for a resolved action.
pub const DEFAULT_STATUS: u16 = 200;

/// Trait for resolving a request path against a single rule.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns the action this rule resolves `path` to, if any.
    fn resolve(&self, path: &str, manifest: &Manifest) -> Option<Action>;
}

/// Serves the request path unchanged when the manifest has it.
#[derive(Debug, Clone, Default)]
pub struct FilesystemRule;

impl Matcher for FilesystemRule {
    fn resolve(&self, path: &str, manifest: &Manifest) -> Option<Action> {
        if !manifest.contains(path) {
            return None;
        }
        Some(Action {
            status_code: DEFAULT_STATUS,
            headers: Vec::new(),
            destination: path.to_string(),
        })
    }
}

/// Rewrites the request path and serves the result when the manifest has it.
#[derive(Debug, Clone)]
pub struct PatternRule {
    source: Pattern,
    destination: String,
    status_code: u16,
    headers: Vec<Header>,
}

impl PatternRule {
    pub fn source(&self) -> &Pattern {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Substitute `destination` for every match of `source` in `path`.
    /// Returns `None` when the pattern does not occur.
    pub fn rewrite(&self, path: &str) -> Option<String> {
        if !self.source.is_match(path) {
            return None;
        }
        Some(
            self.source
                .replace_all(path, self.destination.as_str())
                .into_owned(),
        )
    }
}

impl Matcher for PatternRule {
    fn resolve(&self, path: &str, manifest: &Manifest) -> Option<Action> {
        let new_path = self.rewrite(path)?;
        tracing::trace!(source = %self.source, candidate = %new_path, "Trying rewrite");

        if !manifest.contains(&new_path) {
            tracing::trace!(candidate = %new_path, "Rewrite target not in manifest");
            return None;
        }
        Some(Action {
            status_code: self.status_code,
            headers: self.headers.clone(),
            destination: new_path,
        })
    }
}

/// A compiled routing rule.
#[derive(Debug, Clone)]
pub enum Rule {
    Filesystem(FilesystemRule),
    Pattern(PatternRule),
}

impl Matcher for Rule {
    fn resolve(&self, path: &str, manifest: &Manifest) -> Option<Action> {
        match self {
            Rule::Filesystem(rule) => rule.resolve(path, manifest),
            Rule::Pattern(rule) => rule.resolve(path, manifest),
        }
    }
}

impl TryFrom<RouteConfig> for Rule {
    type Error = RouteViolation;

    fn try_from(route: RouteConfig) -> Result<Self, Self::Error> {
        match check_route(&route)? {
            RuleShape::Filesystem => Ok(Rule::Filesystem(FilesystemRule)),
            RuleShape::Pattern => {
                let (Some(source), Some(destination)) = (route.source, route.destination) else {
                    return Err(RouteViolation::MissingSource);
                };
                let status_code = match route.status_code {
                    Some(code) => u16::try_from(code)
                        .map_err(|_| RouteViolation::StatusCodeOutOfRange(code))?,
                    None => DEFAULT_STATUS,
                };
                Ok(Rule::Pattern(PatternRule {
                    source,
                    destination,
                    status_code,
                    headers: route.headers.unwrap_or_default(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(paths: &[&str]) -> Manifest {
        paths.iter().copied().collect()
    }

    fn pattern_rule(source: &str, destination: &str) -> Rule {
        Rule::try_from(RouteConfig::pattern(Pattern::new(source).unwrap(), destination)).unwrap()
    }

    #[test]
    fn test_filesystem_matcher() {
        let rule = Rule::try_from(RouteConfig::filesystem()).unwrap();
        let manifest = manifest(&["/index.html"]);

        let action = rule.resolve("/index.html", &manifest).unwrap();
        assert_eq!(action.status_code, 200);
        assert_eq!(action.destination, "/index.html");
        assert!(action.headers.is_empty());

        assert!(rule.resolve("/index.htm", &manifest).is_none());
    }

    #[test]
    fn test_filesystem_matcher_drops_configured_headers() {
        let route = RouteConfig::filesystem().with_header(Header::new("X-Served-By", "fs"));
        let rule = Rule::try_from(route).unwrap();
        let action = rule.resolve("/a", &manifest(&["/a"])).unwrap();
        assert!(action.headers.is_empty());
    }

    #[test]
    fn test_pattern_matcher_substitutes_groups() {
        let rule = pattern_rule(r"^/blog/(\w+)$", "/posts/$1.html");
        let action = rule
            .resolve("/blog/hello", &manifest(&["/posts/hello.html"]))
            .unwrap();
        assert_eq!(action.destination, "/posts/hello.html");
        assert_eq!(action.status_code, 200);
    }

    #[test]
    fn test_pattern_matcher_named_groups() {
        let rule = pattern_rule(r"^/u/(?P<user>[a-z]+)$", "/users/${user}/index.html");
        let action = rule
            .resolve("/u/ada", &manifest(&["/users/ada/index.html"]))
            .unwrap();
        assert_eq!(action.destination, "/users/ada/index.html");
    }

    #[test]
    fn test_unanchored_pattern_replaces_within_path() {
        let Rule::Pattern(rule) = pattern_rule(r"\.htm$", ".html") else {
            panic!("expected pattern rule");
        };
        assert_eq!(rule.rewrite("/docs/page.htm").as_deref(), Some("/docs/page.html"));
        assert_eq!(rule.rewrite("/docs/page.txt"), None);

        let Rule::Pattern(rule) = pattern_rule("old", "new") else {
            panic!("expected pattern rule");
        };
        assert_eq!(rule.rewrite("/old/old.txt").as_deref(), Some("/new/new.txt"));
    }

    #[test]
    fn test_pattern_matcher_requires_manifest_hit() {
        let rule = pattern_rule(r"^/blog/(\w+)$", "/posts/$1.html");
        assert!(rule.resolve("/blog/hello", &manifest(&[])).is_none());
        assert!(rule.resolve("/news/hello", &manifest(&["/posts/hello.html"])).is_none());
    }

    #[test]
    fn test_pattern_rule_carries_status_and_headers() {
        let mut header = Header::new("Location", "/new");
        header.overwrite = Some(true);
        let route = RouteConfig::pattern(Pattern::new("^/old$").unwrap(), "/new")
            .with_status(301)
            .with_header(header.clone());
        let rule = Rule::try_from(route).unwrap();

        let action = rule.resolve("/old", &manifest(&["/new"])).unwrap();
        assert_eq!(action.status_code, 301);
        assert_eq!(action.headers, vec![header]);
    }

    #[test]
    fn test_invalid_route_does_not_compile() {
        let route = RouteConfig::pattern(Pattern::new("^/a$").unwrap(), "");
        assert_eq!(
            Rule::try_from(route).unwrap_err(),
            RouteViolation::EmptyDestination
        );
    }
}
