#![forbid(unsafe_code)]

//! pii_sweep (psw) — one-shot, read-only scanner for sensitive-looking text.
//!
//! Walks a file or directory tree, runs every configured detection pattern
//! over each file's content, filters known false positives through per-rule
//! suppression lists, and streams findings as they are discovered.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use pii_sweep::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use pii_sweep::core::config::Config;
//! use pii_sweep::scanner::walker::{TreeWalker, WalkerConfig};
//! ```

pub mod prelude;

pub mod core;
pub mod report;
pub mod scanner;
