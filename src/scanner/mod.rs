//! Scan engine: directory walker, pattern set, path filtering, per-file matching.

pub mod file_scan;
pub mod filter;
pub mod patterns;
pub mod walker;
