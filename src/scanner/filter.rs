//! Path filtering: directory pruning and extension-based file skipping.
//!
//! Folder ignoring is a precise allow/deny list — exact string equality on a
//! directory name or its normalized scan-root-relative path. Deliberately not
//! glob, prefix, or regex matching, so a short entry can never over-prune.

#![allow(missing_docs)]

use std::collections::HashSet;

use crate::core::config::IgnoreConfig;

/// Normalized ignore lists, constructed once before traversal and shared
/// read-only for the scan's duration.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSpec {
    folders: HashSet<String>,
    extensions: HashSet<String>,
}

impl IgnoreSpec {
    /// Build from raw configured entries.
    ///
    /// Folder entries get separators unified to `/` and trailing separators
    /// trimmed; extension entries are lowercased and stripped of a leading dot.
    #[must_use]
    pub fn new(folders: &[String], extensions: &[String]) -> Self {
        Self {
            folders: folders.iter().map(|f| normalize_folder(f)).collect(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Build from the `[ignore]` config section, with an optional extension
    /// override (the CLI `--skip-ext` list replaces the configured one).
    #[must_use]
    pub fn from_config(config: &IgnoreConfig, extension_override: Option<&[String]>) -> Self {
        let extensions = extension_override.unwrap_or(&config.extensions);
        Self::new(&config.folders, extensions)
    }

    /// Whether a directory must be pruned from traversal.
    ///
    /// True iff the bare directory name, or its normalized path relative to
    /// the scan root, exactly equals an ignored entry.
    #[must_use]
    pub fn should_prune_dir(&self, dir_name: &str, relative_path: &str) -> bool {
        self.folders.contains(dir_name) || self.folders.contains(&normalize_folder(relative_path))
    }

    /// Whether a file must be skipped based on its extension.
    ///
    /// The extension is the substring after the last `.` (empty if none);
    /// comparison is lowercase on both sides, so `SECRET.PNG` is skipped
    /// whenever `.png` is ignored.
    #[must_use]
    pub fn should_skip_file(&self, file_name: &str) -> bool {
        let ext = file_name
            .rsplit_once('.')
            .map_or("", |(stem, ext)| if stem.is_empty() { "" } else { ext });
        !ext.is_empty() && self.extensions.contains(&ext.to_lowercase())
    }
}

fn normalize_folder(entry: &str) -> String {
    let unified = if entry.contains('\\') {
        entry.replace('\\', "/")
    } else {
        entry.to_string()
    };
    unified.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(folders: &[&str], extensions: &[&str]) -> IgnoreSpec {
        IgnoreSpec::new(
            &folders.iter().map(|s| (*s).to_string()).collect::<Vec<_>>(),
            &extensions
                .iter()
                .map(|s| (*s).to_string())
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn prunes_by_exact_name() {
        let spec = spec(&["build", "Pods"], &[]);
        assert!(spec.should_prune_dir("build", "deep/nested/build"));
        assert!(spec.should_prune_dir("Pods", "Pods"));
        assert!(!spec.should_prune_dir("builder", "builder"));
        assert!(!spec.should_prune_dir("pods", "pods"));
    }

    #[test]
    fn prunes_by_relative_path() {
        let spec = spec(&["build/Release"], &[]);
        assert!(spec.should_prune_dir("Release", "build/Release"));
        // Name alone is not in the list, and prefix matching is not a thing.
        assert!(!spec.should_prune_dir("Release", "other/Release"));
        assert!(!spec.should_prune_dir("Release", "build/Release/x"));
    }

    #[test]
    fn folder_entries_are_normalized() {
        let spec = spec(&["build/Release/", r"out\bin"], &[]);
        assert!(spec.should_prune_dir("Release", "build/Release"));
        assert!(spec.should_prune_dir("bin", "out/bin"));
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let spec = spec(&[], &[".png", "jpg"]);
        assert!(spec.should_skip_file("SECRET.PNG"));
        assert!(spec.should_skip_file("photo.Jpg"));
        assert!(!spec.should_skip_file("notes.txt"));
    }

    #[test]
    fn files_without_extension_are_never_skipped() {
        let spec = spec(&[], &[".png", ".txt"]);
        assert!(!spec.should_skip_file("Makefile"));
        assert!(!spec.should_skip_file("README"));
    }

    #[test]
    fn leading_dot_only_names_have_no_extension() {
        let spec = spec(&[], &[".gitignore", ".env"]);
        // ".gitignore" is a bare name, not an empty stem with an extension.
        assert!(!spec.should_skip_file(".gitignore"));
    }

    #[test]
    fn compound_names_use_last_extension() {
        let spec = spec(&[], &[".gz"]);
        assert!(spec.should_skip_file("archive.tar.gz"));
        assert!(!spec.should_skip_file("archive.gz.txt"));
    }

    #[test]
    fn override_replaces_configured_extensions() {
        let config = IgnoreConfig {
            folders: vec!["build".to_string()],
            extensions: vec![".png".to_string()],
        };
        let over = vec!["log".to_string()];
        let spec = IgnoreSpec::from_config(&config, Some(&over));
        assert!(spec.should_skip_file("trace.log"));
        assert!(!spec.should_skip_file("image.png"));
        // Folder list is unaffected by the extension override.
        assert!(spec.should_prune_dir("build", "build"));
    }

    #[test]
    fn empty_override_disables_skipping() {
        let config = IgnoreConfig::default();
        let spec = IgnoreSpec::from_config(&config, Some(&[]));
        assert!(!spec.should_skip_file("image.png"));
    }
}
