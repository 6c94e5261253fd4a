//! Version tokens embedded in install scripts and hook shims

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;

/// Line carrying the version of a deployed script.
pub const VERSION_PATTERN: &str = r"(?m)^#\s*Version:\s*(\S+)";

/// First version token in `script`.
pub fn extract_version(script: &str) -> Option<String> {
    Regex::new(VERSION_PATTERN)
        .ok()?
        .captures(script)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// The line [`extract_version`] reads back.
pub fn version_line(version: &str) -> String {
    format!("# Version: {version}")
}

/// Decides whether a fetched version replaces the installed one.
pub trait VersionComparator {
    fn is_newer(&self, current: &str, candidate: &str) -> bool;
}

/// Semver ordering when both tokens parse, component-wise otherwise.
///
/// Components split on `.`, `-` and `+`; numeric pairs compare as numbers,
/// anything else lexicographically. A token that is a prefix of the other
/// is older.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericVersionComparator;

impl VersionComparator for NumericVersionComparator {
    fn is_newer(&self, current: &str, candidate: &str) -> bool {
        let current = current.trim().trim_start_matches('v');
        let candidate = candidate.trim().trim_start_matches('v');
        if let (Ok(a), Ok(b)) = (Version::parse(current), Version::parse(candidate)) {
            return b > a;
        }
        compare_components(current, candidate) == Ordering::Less
    }
}

fn compare_components(a: &str, b: &str) -> Ordering {
    let split = |s: &'_ str| -> Vec<String> {
        s.split(['.', '-', '+'])
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    };
    let (a, b) = (split(a), split(b));
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}
