//! Constraint parsing and version ordering
//!
//! A constraint is the value side of a `dependencies` entry (`^1.1.0`,
//! `~1.3.0`, `>=2.0.0`, `latest`, ...). Parsing splits it into the rule used
//! for selection and the numeric triple the rule is applied to:
//! - `latest`, `*` - last published version
//! - `1.2.3`, `=1.2.3`, `v1.2.3` - exact version
//! - `^1.2.3` - same major, highest minor/patch
//! - `~1.2.3` - same major.minor, highest patch
//! - `>1.2.3`, `>=1.2.3` - first published version above
//! - `<1.2.3`, `<=1.2.3` - first published version below
//!
//! Partial versions (`1`, `1.2`) are padded with zeros and wildcard
//! components (`1.x`, `1.2.X`, `1.2.*`) are read as `0`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::error::ResolveError;

/// `major[.minor[.patch]]` followed by an arbitrary suffix
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?(.*)$").unwrap()
});

/// A numeric version triple plus whatever followed it in the source string
///
/// Ordering only looks at `(major, minor, patch)`; the suffix (pre-release,
/// build metadata, or the tail of a compound range) is carried along so the
/// original key can be rebuilt, but never compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub suffix: Option<String>,
}

impl ParsedVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            suffix: None,
        }
    }

    /// Parse a bare version string (no qualifier), e.g. a catalog key
    ///
    /// Examples:
    /// - "1" -> 1.0.0
    /// - "1.2" -> 1.2.0
    /// - "1.x.x" -> 1.0.0
    /// - "1.2.3-beta.1" -> 1.2.3 with suffix "-beta.1"
    pub fn parse(version: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(version)?;

        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = parse_component(caps.get(2).map(|m| m.as_str()))?;
        let patch = parse_component(caps.get(3).map(|m| m.as_str()))?;
        let suffix = caps
            .get(4)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Some(Self {
            major,
            minor,
            patch,
            suffix,
        })
    }

    /// The registry key this version names
    ///
    /// Keeps a pre-release or build tag (`-beta.1`, `+build.5`) but drops any
    /// other trailing text, such as the tail of a compound range.
    pub fn version_key(&self) -> String {
        match &self.suffix {
            Some(suffix) if suffix.starts_with(['-', '+']) => {
                format!("{}.{}.{}{}", self.major, self.minor, self.patch, suffix)
            }
            _ => format!("{}.{}.{}", self.major, self.minor, self.patch),
        }
    }

    /// The `(major, minor, patch)` triple used for ordering
    pub fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = &self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}

/// Missing and wildcard components both count as zero
fn parse_component(component: Option<&str>) -> Option<u32> {
    match component {
        None | Some("x") | Some("X") | Some("*") => Some(0),
        Some(digits) => digits.parse().ok(),
    }
}

/// Compare two versions by `(major, minor, patch)`, ignoring suffixes
pub fn compare(a: &ParsedVersion, b: &ParsedVersion) -> Ordering {
    a.triple().cmp(&b.triple())
}

/// A parsed version constraint
///
/// Each variant has its own selection rule in
/// [`selector`](crate::version::selector). `>=` and `<=` share the buckets of
/// `>` and `<`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `latest` or `*`
    Latest,
    /// No range operator; resolved by fetching this exact version
    Exact(ParsedVersion),
    /// `^`
    Caret(ParsedVersion),
    /// `~`
    Tilde(ParsedVersion),
    /// `>` or `>=`
    GreaterThan(ParsedVersion),
    /// `<` or `<=`
    LessThan(ParsedVersion),
}

impl Constraint {
    /// Parse a raw constraint string
    ///
    /// Returns `MalformedConstraint` when no leading version number can be
    /// found and the string is neither `latest` nor `*`.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let spec = raw.trim();

        if spec == "latest" || spec == "*" {
            return Ok(Constraint::Latest);
        }

        let (make, rest): (fn(ParsedVersion) -> Constraint, &str) =
            if let Some(rest) = spec.strip_prefix(">=") {
                (Constraint::GreaterThan, rest)
            } else if let Some(rest) = spec.strip_prefix('>') {
                (Constraint::GreaterThan, rest)
            } else if let Some(rest) = spec.strip_prefix("<=") {
                (Constraint::LessThan, rest)
            } else if let Some(rest) = spec.strip_prefix('<') {
                (Constraint::LessThan, rest)
            } else if let Some(rest) = spec.strip_prefix('^') {
                (Constraint::Caret, rest)
            } else if let Some(rest) = spec.strip_prefix('~') {
                (Constraint::Tilde, rest)
            } else if let Some(rest) = spec.strip_prefix('=') {
                (Constraint::Exact, rest)
            } else {
                (Constraint::Exact, spec)
            };

        let rest = rest.trim_start();
        let rest = rest.strip_prefix('v').unwrap_or(rest);

        ParsedVersion::parse(rest)
            .map(make)
            .ok_or_else(|| ResolveError::MalformedConstraint(raw.to_string()))
    }
}
