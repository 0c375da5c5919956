//! Scan output stream: the event types every scan emits and the renderers
//! that turn them into human-readable or line-delimited JSON output.
//!
//! Events are the only channel findings travel on. The walker never prints;
//! the single consumer of the event stream owns stdout/stderr, which is what
//! keeps concurrent per-file output from interleaving.

#![allow(missing_docs)]

use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::scanner::file_scan::ScanResult;

/// One record on the scan output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A file produced at least one surviving match.
    Matches(ScanResult),
    /// A configured pattern failed to compile and its rule was dropped.
    ConfigWarning { rule: String, message: String },
    /// A file or directory entry could not be read; the walk continued.
    FileError { display_path: String, message: String },
    /// Terminal event: total number of files actually scanned.
    Summary { files_processed: usize },
}

/// JSON form of an event, one object per stream line.
///
/// Shape is stable: a `ts` timestamp, an `event` discriminant, then
/// event-specific fields.
#[must_use]
pub fn json_value(event: &ScanEvent) -> serde_json::Value {
    let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    match event {
        ScanEvent::Matches(result) => json!({
            "ts": ts,
            "event": "matches",
            "path": result.display_path,
            "matches": result.matches,
        }),
        ScanEvent::ConfigWarning { rule, message } => json!({
            "ts": ts,
            "event": "config_warning",
            "rule": rule,
            "message": message,
        }),
        ScanEvent::FileError {
            display_path,
            message,
        } => json!({
            "ts": ts,
            "event": "file_error",
            "path": display_path,
            "message": message,
        }),
        ScanEvent::Summary { files_processed } => json!({
            "ts": ts,
            "event": "summary",
            "files_processed": files_processed,
        }),
    }
}

#[cfg(feature = "cli")]
pub use human::{OutputMode, Reporter};

#[cfg(feature = "cli")]
mod human {
    use colored::Colorize;

    use super::{ScanEvent, json_value};

    /// Output mode for a scan run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum OutputMode {
        Human,
        Json,
    }

    /// Single consumer of the event stream; owns all terminal output.
    #[derive(Debug, Clone, Copy)]
    pub struct Reporter {
        mode: OutputMode,
        quiet: bool,
    }

    impl Reporter {
        #[must_use]
        pub fn new(mode: OutputMode, quiet: bool) -> Self {
            Self { mode, quiet }
        }

        /// Pre-scan banner: target plus the effective ignore lists.
        /// Human mode only; suppressed by `--quiet`.
        pub fn banner(&self, target: &str, folders: &[String], extensions: &[String]) {
            if self.quiet || self.mode == OutputMode::Json {
                return;
            }
            println!("{} {}", "Scanning target:".bold(), target);
            println!("Ignoring folders: {}", folders.join(", "));
            if extensions.is_empty() {
                println!("Skipping extensions: (none)");
            } else {
                println!("Skipping extensions: {}", extensions.join(", "));
            }
            println!();
        }

        /// Render one event.
        pub fn emit(&self, event: &ScanEvent) {
            match self.mode {
                OutputMode::Json => println!("{}", json_value(event)),
                OutputMode::Human => self.emit_human(event),
            }
        }

        fn emit_human(&self, event: &ScanEvent) {
            match event {
                ScanEvent::Matches(result) => {
                    println!(
                        "{}",
                        format!("--- Matches found in File: {} ---", result.display_path)
                            .yellow()
                            .bold()
                    );
                    for m in &result.matches {
                        println!(
                            "  [{}] line {}: {}",
                            m.rule_name.cyan(),
                            m.line,
                            m.text.red()
                        );
                    }
                    println!();
                }
                ScanEvent::ConfigWarning { rule, message } => {
                    if !self.quiet {
                        eprintln!(
                            "{} rule '{rule}' dropped: {message}",
                            "warning:".yellow().bold()
                        );
                    }
                }
                ScanEvent::FileError {
                    display_path,
                    message,
                } => {
                    if !self.quiet {
                        eprintln!("{} {display_path}: {message}", "error:".red().bold());
                    }
                }
                ScanEvent::Summary { files_processed } => {
                    println!("Files processed: {files_processed}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::file_scan::{RuleMatch, ScanResult};

    #[test]
    fn matches_event_serializes_path_and_matches() {
        let event = ScanEvent::Matches(ScanResult {
            display_path: "src/notes.txt".to_string(),
            matches: vec![RuleMatch {
                rule_name: "Email Address".to_string(),
                text: "a@b.com".to_string(),
                line: 3,
            }],
        });
        let value = json_value(&event);
        assert_eq!(value["event"], "matches");
        assert_eq!(value["path"], "src/notes.txt");
        assert_eq!(value["matches"][0]["rule_name"], "Email Address");
        assert_eq!(value["matches"][0]["line"], 3);
        assert!(value["ts"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn summary_event_carries_the_count() {
        let value = json_value(&ScanEvent::Summary {
            files_processed: 42,
        });
        assert_eq!(value["event"], "summary");
        assert_eq!(value["files_processed"], 42);
    }

    #[test]
    fn file_error_event_names_the_file() {
        let value = json_value(&ScanEvent::FileError {
            display_path: "gone.txt".to_string(),
            message: "permission denied".to_string(),
        });
        assert_eq!(value["event"], "file_error");
        assert_eq!(value["path"], "gone.txt");
    }
}
