//! Configuration system: TOML file + env var overrides + built-in defaults.
//!
//! Rule and suppression content is injected data: the built-in defaults are
//! carried exactly as configured upstream, odd escaping included, and are
//! never corrected by the engine.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SweepError};

/// Full pii_sweep configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Detection rules, in report order. Order is file order, not alphabetical.
    pub rules: Vec<RuleConfig>,
    /// Per-rule suppression lists. Entries naming no existing rule are inert.
    pub suppressions: Vec<SuppressionConfig>,
    pub ignore: IgnoreConfig,
    pub scan: ScanConfig,
}

/// One named detection rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RuleConfig {
    pub name: String,
    pub pattern: String,
}

/// Suppression patterns owned by a single detection rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SuppressionConfig {
    pub rule: String,
    pub patterns: Vec<String>,
}

/// Traversal filtering: pruned folders and skipped file extensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Folder names or scan-root-relative paths to prune. Exact match only.
    pub folders: Vec<String>,
    /// File extensions to skip, with or without the leading dot.
    pub extensions: Vec<String>,
}

/// Walker behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// Worker threads for file scanning. 1 gives strictly sequential traversal.
    pub parallelism: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            folders: default_ignored_folders(),
            extensions: default_ignored_extensions(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            suppressions: default_suppressions(),
            ignore: IgnoreConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration path (`~/.config/psw/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        home_dir.join(".config").join("psw").join("config.toml")
    }

    /// Load config, then apply env overrides.
    ///
    /// Source resolution order: explicit path, else the `PSW_CONFIG` env var,
    /// else the default path. A missing file is an error for the first two
    /// (the operator asked for that file); a missing default-path file just
    /// means built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = env_var("PSW_CONFIG").map(PathBuf::from);
        let (path_buf, is_explicit_path) = Self::resolve_source(path, env_path);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| SweepError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(SweepError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    fn resolve_source(path: Option<&Path>, env_path: Option<PathBuf>) -> (PathBuf, bool) {
        match (path, env_path) {
            (Some(explicit), _) => (explicit.to_path_buf(), true),
            (None, Some(from_env)) => (from_env, true),
            (None, None) => (Self::default_path(), false),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        set_env_usize("PSW_SCAN_PARALLELISM", &mut self.scan.parallelism)?;
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_env_usize(name: &str, slot: &mut usize) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = raw.parse::<usize>().map_err(|error| SweepError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

fn rule(name: &str, pattern: &str) -> RuleConfig {
    RuleConfig {
        name: name.to_string(),
        pattern: pattern.to_string(),
    }
}

/// Built-in detection rules.
///
/// Several upstream patterns carry doubled escape sequences that make them
/// match literal backslash-letter text instead of the intended word-boundary
/// and digit constructs. They are reproduced unchanged: rule content is
/// injected configuration data, not engine logic.
fn default_rules() -> Vec<RuleConfig> {
    vec![
        rule("Email Address", r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"),
        rule("IPv4 Address", r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b"),
        rule("8 digit number", r"\\b\\d{8}\\b"),
        rule("authcate", r"\\b\\w{4}\\d{4}\\b"),
        rule("API key", r"\\b[A-Za-z0-9]{32,}\\b"),
        rule("API key 2", r#"[\"\']?([A-Za-z0-9_\-]{60,})={0,2}[\"\']?"#),
        rule("Credit cards", r"\\b(?:\\d[ -]*?){13,16}\\b"),
        rule("JWT tokens", r"\\b[A-Za-z0-9-_]+\\.[A-Za-z0-9-_]+\\.[A-Za-z0-9-_]+\\b"),
        rule(
            "Passwords in code",
            r"\\b(?:password|passwd|pwd|secret|api_key|apikey|token|auth_token|access_token|private_key)\\b",
        ),
    ]
}

/// Built-in per-rule suppression lists.
///
/// The "URL" entry names no built-in rule and stays inert until such a rule
/// is configured.
fn default_suppressions() -> Vec<SuppressionConfig> {
    vec![
        SuppressionConfig {
            rule: "Email Address".to_string(),
            patterns: vec![
                r"\.(png|jpg|jpeg|gif|svg|webp)$".to_string(),
                "dummy@".to_string(),
                "gary@monash.edu".to_string(),
                r"'Test.Test@idmqat.monash.edu".to_string(),
                "johndoe@john.com".to_string(),
            ],
        },
        SuppressionConfig {
            rule: "URL".to_string(),
            patterns: vec![
                "localhost".to_string(),
                r"127\.0\.0\.1".to_string(),
                r"\.(png|jpg|jpeg|gif|css|js)$".to_string(),
            ],
        },
        SuppressionConfig {
            rule: "API key 2".to_string(),
            patterns: vec!["^test_.*".to_string()],
        },
    ]
}

fn default_ignored_folders() -> Vec<String> {
    [
        ".git",
        ".hg",
        "venv",
        "env",
        "Pods",
        "build",
        "DerivedData",
        "xcuserdata",
        "project.xcworkspace",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_ignored_extensions() -> Vec<String> {
    [
        ".png", ".jpg", ".jpeg", ".gif", ".zip", ".gz", ".tar", ".exe", ".dll", ".o", ".so",
        ".class", ".mp3", ".mp4", ".mov", ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt",
        ".pptx", ".iso", ".dmg", ".svg", ".webp", ".DS_Store", ".ttf", ".pbxproj",
        ".xcuserstate", ".resolved",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
