//! Filename patterns for volume-file discovery and metadata extraction
//!
//! Each source type defines one canonical filename pattern with named
//! capture groups. The same pattern does double duty:
//! - with group names stripped it is the default *traversal filter*,
//!   deciding which files are visited at all (users may override it with
//!   their own regex, which need not carry named groups)
//! - with group names intact it is the *extractor*, pulling subject,
//!   hemisphere and variant metadata out of a matched filename
//!
//! The two stay separate on purpose: narrowing the filter must never
//! change how metadata is extracted.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static GROUP_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?P<[^>]+>").expect("invalid group-name regex"));

/// Strip named-capture-group syntax from a regex pattern, turning
/// `(?P<h>[lr])` into `([lr])`.
pub fn strip_group_names(pattern: &str) -> String {
    GROUP_NAME_REGEX.replace_all(pattern, "").into_owned()
}

/// Canonical extraction pattern plus its derived traversal filter.
pub struct SourcePattern {
    extraction: Regex,
    filter: Regex,
    filter_pattern: String,
}

impl SourcePattern {
    /// Compile a canonical pattern with named capture groups.
    ///
    /// Panics on an invalid pattern; callers pass compile-time constants.
    pub fn new(pattern: &str) -> Self {
        let filter_pattern = strip_group_names(pattern);
        Self {
            extraction: Regex::new(pattern).expect("invalid canonical filename pattern"),
            filter: Regex::new(&filter_pattern).expect("invalid derived filter pattern"),
            filter_pattern,
        }
    }

    /// The default traversal filter (canonical pattern, group names stripped)
    pub fn filter(&self) -> &Regex {
        &self.filter
    }

    /// Source text of the default traversal filter, for CLI help output
    pub fn filter_pattern(&self) -> &str {
        &self.filter_pattern
    }

    /// Whether the default filter matches anywhere in `filename`
    /// (substring search, like user-supplied overrides)
    pub fn matches(&self, filename: &str) -> bool {
        self.filter.is_match(filename)
    }

    /// Run the canonical extractor against `filename`
    pub fn extract<'t>(&self, filename: &'t str) -> Option<Captures<'t>> {
        self.extraction.captures(filename)
    }
}
