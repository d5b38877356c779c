//! Version selection from a registry catalog
//!
//! Every rule scans the catalog in the order the registry returned it:
//! - `Latest` - the last key
//! - `^` - highest `(minor, patch)` sharing the major
//! - `~` - highest patch sharing `(major, minor)`
//! - `>` / `<` - the first key above / below the constraint, not the
//!   maximum / minimum
//!
//! Keys that do not parse as versions are skipped.

use tracing::debug;

use crate::version::constraint::{Constraint, ParsedVersion, compare};
use crate::version::types::{CatalogEntry, VersionCatalog};

/// Pick the catalog entry satisfying `constraint`
///
/// Returns the matched version string together with its catalog entry, or
/// `None` when no entry satisfies the rule. Only keys are consulted, so a
/// malformed entry can still be selected.
pub fn select<'a>(
    catalog: &'a VersionCatalog,
    constraint: &Constraint,
) -> Option<(&'a str, &'a CatalogEntry)> {
    let key = match constraint {
        Constraint::Latest => select_latest(catalog),
        Constraint::Exact(base) => own_key(catalog, base),
        Constraint::Caret(base) => select_caret(catalog, base),
        Constraint::Tilde(base) => select_tilde(catalog, base),
        Constraint::GreaterThan(base) => select_greater_than(catalog, base),
        Constraint::LessThan(base) => select_less_than(catalog, base),
    }?;

    catalog
        .get_key_value(key)
        .map(|(version, entry)| (version.as_str(), entry))
}

fn parsed_keys(catalog: &VersionCatalog) -> impl Iterator<Item = (&str, ParsedVersion)> {
    catalog.keys().filter_map(|key| match ParsedVersion::parse(key) {
        Some(parsed) => Some((key.as_str(), parsed)),
        None => {
            debug!("Skipping unparseable catalog version {:?}", key);
            None
        }
    })
}

/// The constraint's own version, if it was published
///
/// Tries the version with its pre-release tag first (`1.0.0-beta`), then the
/// bare triple.
fn own_key<'a>(catalog: &'a VersionCatalog, base: &ParsedVersion) -> Option<&'a str> {
    let bare = ParsedVersion::new(base.major, base.minor, base.patch);
    [base.version_key(), bare.version_key()]
        .iter()
        .find_map(|candidate| catalog.get_key_value(candidate.as_str()))
        .map(|(key, _)| key.as_str())
}

fn select_latest(catalog: &VersionCatalog) -> Option<&str> {
    catalog.last().map(|(key, _)| key.as_str())
}

fn select_caret<'a>(catalog: &'a VersionCatalog, base: &ParsedVersion) -> Option<&'a str> {
    let mut floor = (base.minor, base.patch);
    let mut best = None;

    for (key, version) in parsed_keys(catalog) {
        if version.major == base.major && (version.minor, version.patch) > floor {
            floor = (version.minor, version.patch);
            best = Some(key);
        }
    }

    best.or_else(|| own_key(catalog, base))
}

fn select_tilde<'a>(catalog: &'a VersionCatalog, base: &ParsedVersion) -> Option<&'a str> {
    let mut floor = base.patch;
    let mut best = None;

    for (key, version) in parsed_keys(catalog) {
        if version.major == base.major && version.minor == base.minor && version.patch > floor {
            floor = version.patch;
            best = Some(key);
        }
    }

    best.or_else(|| own_key(catalog, base))
}

fn select_greater_than<'a>(catalog: &'a VersionCatalog, base: &ParsedVersion) -> Option<&'a str> {
    parsed_keys(catalog)
        .find(|(_, version)| compare(version, base).is_gt())
        .map(|(key, _)| key)
}

fn select_less_than<'a>(catalog: &'a VersionCatalog, base: &ParsedVersion) -> Option<&'a str> {
    parsed_keys(catalog)
        .find(|(_, version)| compare(version, base).is_lt())
        .map(|(key, _)| key)
}
