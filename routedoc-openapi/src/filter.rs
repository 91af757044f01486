//! Decides which registered paths appear in the document.

use crate::config::{ExcludeEntry, SwaggerConfig};
use crate::error::SwaggerError;
use regex::Regex;
use routedoc_core::{Route, RouteMethod};

/// One compiled `exclude` entry.
#[derive(Debug, Clone)]
pub enum ExcludeRule {
    /// Excludes exactly this path.
    Exact(String),
    /// Excludes every path the expression matches.
    Pattern(Regex),
}

impl ExcludeRule {
    pub fn compile(entry: &ExcludeEntry) -> Result<Self, SwaggerError> {
        match entry {
            ExcludeEntry::Path(path) => Ok(ExcludeRule::Exact(path.clone())),
            ExcludeEntry::Pattern { pattern } => Regex::new(pattern)
                .map(ExcludeRule::Pattern)
                .map_err(|source| SwaggerError::InvalidExcludePattern {
                    pattern: pattern.clone(),
                    source,
                }),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            ExcludeRule::Exact(excluded) => excluded == path,
            ExcludeRule::Pattern(regex) => regex.is_match(path),
        }
    }
}

/// Path filter built once per plugin instance.
///
/// Rules are matched against the full registered path.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    exclude_static_file: bool,
    rules: Vec<ExcludeRule>,
    reserved: Vec<String>,
}

impl PathFilter {
    /// Compile the `exclude` entries, failing on the first invalid pattern.
    pub fn new(exclude_static_file: bool, exclude: &[ExcludeEntry]) -> Result<Self, SwaggerError> {
        let rules = exclude
            .iter()
            .map(ExcludeRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            exclude_static_file,
            rules,
            reserved: Vec::new(),
        })
    }

    /// Filter for a plugin configuration. The plugin's own endpoints are
    /// always excluded.
    pub fn from_config(config: &SwaggerConfig) -> Result<Self, SwaggerError> {
        let mut filter = Self::new(config.exclude_static_file, &config.exclude)?;
        let docs_path = config.docs_path();
        filter.reserved = vec![docs_path.clone(), format!("{docs_path}/json")];
        Ok(filter)
    }

    /// Whether a route registered at `path` belongs in the document.
    ///
    /// The method is accepted for symmetry with the route table; rules only
    /// look at the path.
    pub fn should_include(&self, path: &str, _method: RouteMethod) -> bool {
        if path.contains('*') || self.reserved.iter().any(|r| r == path) {
            return false;
        }
        if self.exclude_static_file && is_static_file(path) {
            return false;
        }
        !self.rules.iter().any(|rule| rule.matches(path))
    }

    /// [`should_include`](Self::should_include) plus the route's `hide` flag.
    pub fn includes_route(&self, route: &Route) -> bool {
        !route.hooks.hide && self.should_include(&route.path, route.method)
    }
}

/// Heuristic for asset routes: the last path segment has a `.` followed by
/// at least one character (`/favicon.ico`, `/health.json`).
pub fn is_static_file(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rfind('.') {
        Some(dot) => dot + 1 < last.len(),
        None => false,
    }
}
