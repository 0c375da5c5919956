//! Pattern set: named detection rules plus per-rule suppression lists.
//!
//! Compiled once from configuration before traversal begins, then shared
//! read-only across scan workers. A pattern string that fails to compile never
//! aborts the run: the rule (or single suppression entry) is dropped and a
//! warning is surfaced on the report stream.

#![allow(missing_docs)]

use std::collections::HashMap;

use regex::Regex;

use crate::core::config::{RuleConfig, SuppressionConfig};

/// One compiled detection rule. Identity is the name, unique across the set.
#[derive(Debug, Clone)]
pub struct DetectionRule {
    pub name: String,
    pub regex: Regex,
}

/// Warning produced when a configured pattern fails to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileWarning {
    pub rule: String,
    pub pattern: String,
    pub message: String,
}

/// Immutable set of detection rules and suppression lists.
///
/// Rule iteration order is configuration order; it determines report order.
/// Suppression lists are keyed by owning rule name — keys naming no current
/// rule are simply inert.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<DetectionRule>,
    suppressions: HashMap<String, Vec<Regex>>,
}

impl PatternSet {
    /// Compile raw rule and suppression patterns.
    ///
    /// Invalid patterns are excluded and reported via the returned warnings;
    /// everything else compiles and participates normally.
    pub fn compile(
        rules: &[RuleConfig],
        suppressions: &[SuppressionConfig],
    ) -> (Self, Vec<CompileWarning>) {
        let mut warnings = Vec::new();

        let mut compiled_rules = Vec::with_capacity(rules.len());
        for raw in rules {
            match Regex::new(&raw.pattern) {
                Ok(regex) => compiled_rules.push(DetectionRule {
                    name: raw.name.clone(),
                    regex,
                }),
                Err(err) => warnings.push(CompileWarning {
                    rule: raw.name.clone(),
                    pattern: raw.pattern.clone(),
                    message: err.to_string(),
                }),
            }
        }

        let mut compiled_suppressions: HashMap<String, Vec<Regex>> = HashMap::new();
        for raw in suppressions {
            let slot = compiled_suppressions.entry(raw.rule.clone()).or_default();
            for pattern in &raw.patterns {
                match Regex::new(pattern) {
                    Ok(regex) => slot.push(regex),
                    Err(err) => warnings.push(CompileWarning {
                        rule: raw.rule.clone(),
                        pattern: pattern.clone(),
                        message: err.to_string(),
                    }),
                }
            }
        }

        (
            Self {
                rules: compiled_rules,
                suppressions: compiled_suppressions,
            },
            warnings,
        )
    }

    /// Detection rules in report order.
    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    /// All non-overlapping matches of one rule, in discovery order.
    ///
    /// Duplicates are preserved; each match carries its byte offset in
    /// `content` so the caller can attach line numbers.
    #[must_use]
    pub fn find_matches<'c>(rule: &DetectionRule, content: &'c str) -> Vec<(usize, &'c str)> {
        rule.regex
            .find_iter(content)
            .map(|m| (m.start(), m.as_str()))
            .collect()
    }

    /// Whether any suppression pattern registered under `rule_name` matches
    /// anywhere within `matched_text`.
    ///
    /// Substring search, not full-match, short-circuiting on the first hit.
    /// A short suppression pattern can therefore discard an unrelated long
    /// match that happens to contain it; that upstream behavior is kept.
    #[must_use]
    pub fn is_suppressed(&self, rule_name: &str, matched_text: &str) -> bool {
        self.suppressions
            .get(rule_name)
            .is_some_and(|list| list.iter().any(|re| re.is_match(matched_text)))
    }

    /// Number of suppression patterns registered for a rule (diagnostics).
    #[must_use]
    pub fn suppression_count(&self, rule_name: &str) -> usize {
        self.suppressions.get(rule_name).map_or(0, Vec::len)
    }
}
