//! Per-file scanning: run every detection rule over one file's content and
//! keep the matches that survive suppression filtering.
//!
//! Scanning one file never observes another file's state, so scans are safe
//! to run concurrently against a shared read-only [`PatternSet`].

#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use memchr::memchr_iter;
use serde::Serialize;

use crate::core::errors::{Result, SweepError};
use crate::scanner::patterns::PatternSet;

/// One surviving match: rule name, matched text, 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    pub rule_name: String,
    pub text: String,
    pub line: usize,
}

/// All surviving matches for one file.
///
/// Ordering is rule order first (configuration order), then discovery order
/// within a rule. A file with no surviving matches produces no `ScanResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub display_path: String,
    pub matches: Vec<RuleMatch>,
}

/// Scan already-loaded content. Pure function over `(content, patterns)`.
///
/// Empty or whitespace-only content yields `None`, as does content where
/// every candidate match is suppressed.
#[must_use]
pub fn scan_content(display_path: &str, content: &str, patterns: &PatternSet) -> Option<ScanResult> {
    if content.trim().is_empty() {
        return None;
    }

    let lines = LineIndex::new(content);
    let mut matches = Vec::new();

    for rule in patterns.rules() {
        for (offset, text) in PatternSet::find_matches(rule, content) {
            if patterns.is_suppressed(&rule.name, text) {
                continue;
            }
            matches.push(RuleMatch {
                rule_name: rule.name.clone(),
                text: text.to_string(),
                line: lines.line_of(offset),
            });
        }
    }

    if matches.is_empty() {
        return None;
    }
    Some(ScanResult {
        display_path: display_path.to_string(),
        matches,
    })
}

/// Read and scan one file.
///
/// Content is decoded leniently: undecodable byte sequences are substituted
/// rather than failing the file — a scanner must never crash on binary-looking
/// text. A file that cannot be opened at all is a per-file IO error for the
/// caller to report; it never aborts the surrounding walk.
pub fn scan_file(
    path: &Path,
    display_path: &str,
    patterns: &PatternSet,
) -> Result<Option<ScanResult>> {
    let bytes = fs::read(path).map_err(|source| SweepError::io(path, source))?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(scan_content(display_path, &content, patterns))
}

/// Newline offset index for cheap offset → line translation.
struct LineIndex {
    newline_offsets: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        Self {
            newline_offsets: memchr_iter(b'\n', content.as_bytes()).collect(),
        }
    }

    /// 1-based line number containing the given byte offset.
    fn line_of(&self, offset: usize) -> usize {
        self.newline_offsets.partition_point(|&nl| nl < offset) + 1
    }
}
