//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use pii_sweep::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, SweepError};

// Scanner
pub use crate::scanner::file_scan::{RuleMatch, ScanResult, scan_content, scan_file};
pub use crate::scanner::filter::IgnoreSpec;
pub use crate::scanner::patterns::{CompileWarning, PatternSet};
pub use crate::scanner::walker::{TreeWalker, WalkerConfig};

// Report
pub use crate::report::ScanEvent;
