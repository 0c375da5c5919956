//! Concurrent tree walker.
//!
//! A small worker pool pulls directories off a shared work queue, lists each
//! one, scans the files it contains, and enqueues the subdirectories that
//! survive pruning. Findings stream back to the caller over a channel; the
//! stream always terminates with a [`ScanEvent::Summary`].
//!
//! Pruning for a directory's children is decided as one pure step over the
//! complete listing before any child is dispatched, so a pruned subtree is
//! never entered, not even partially.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded, unbounded};

use crate::core::errors::{Result, SweepError};
use crate::report::ScanEvent;
use crate::scanner::file_scan::scan_file;
use crate::scanner::filter::IgnoreSpec;
use crate::scanner::patterns::PatternSet;

const WORK_QUEUE_CAPACITY: usize = 4096;
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Walk parameters.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Scan root; a regular file is scanned directly, a directory is walked.
    pub root: PathBuf,
    /// Worker thread count. `1` reproduces a sequential scan.
    pub parallelism: usize,
}

/// A directory queued for listing: absolute path plus its scan-root-relative
/// path (empty for the root itself).
struct WorkItem {
    dir: PathBuf,
    rel: String,
}

/// Subdirectory discovered while listing a parent, held back until pruning
/// has been decided for the whole listing.
struct ChildDir {
    name: String,
    rel: String,
    path: PathBuf,
}

/// One-shot, read-only traversal of the configured root.
pub struct TreeWalker {
    config: WalkerConfig,
    patterns: Arc<PatternSet>,
    ignore: Arc<IgnoreSpec>,
}

impl TreeWalker {
    #[must_use]
    pub fn new(config: WalkerConfig, patterns: PatternSet, ignore: IgnoreSpec) -> Self {
        Self {
            config,
            patterns: Arc::new(patterns),
            ignore: Arc::new(ignore),
        }
    }

    /// Start the walk and return the event stream.
    ///
    /// The root is checked up front: a missing root is a fatal
    /// [`SweepError::RootNotFound`] and no event is ever emitted. After this
    /// returns `Ok`, every failure is a per-entry [`ScanEvent::FileError`]
    /// and the stream still ends with a [`ScanEvent::Summary`].
    pub fn stream(&self) -> Result<Receiver<ScanEvent>> {
        let metadata = fs::metadata(&self.config.root).map_err(|_| SweepError::RootNotFound {
            path: self.config.root.clone(),
        })?;

        let (event_tx, event_rx) = unbounded();
        if metadata.is_file() {
            self.spawn_single_file(event_tx);
        } else {
            self.spawn_pool(event_tx);
        }
        Ok(event_rx)
    }

    /// Run the walk to completion and collect every event.
    pub fn walk(&self) -> Result<Vec<ScanEvent>> {
        Ok(self.stream()?.iter().collect())
    }

    /// Root is a regular file: extension check, then a direct scan. No
    /// pruning logic applies, and the display path is the bare file name.
    fn spawn_single_file(&self, events: Sender<ScanEvent>) {
        let path = self.config.root.clone();
        let patterns = Arc::clone(&self.patterns);
        let ignore = Arc::clone(&self.ignore);

        thread::spawn(move || {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let mut files_processed = 0;
            if !ignore.should_skip_file(&name) {
                files_processed = 1;
                match scan_file(&path, &name, &patterns) {
                    Ok(Some(result)) => {
                        let _ = events.send(ScanEvent::Matches(result));
                    }
                    Ok(None) => {}
                    Err(err) => {
                        let _ = events.send(ScanEvent::FileError {
                            display_path: name,
                            message: err.to_string(),
                        });
                    }
                }
            }
            let _ = events.send(ScanEvent::Summary { files_processed });
        });
    }

    fn spawn_pool(&self, events: Sender<ScanEvent>) {
        let (work_tx, work_rx) = bounded::<WorkItem>(WORK_QUEUE_CAPACITY);
        // Number of directories enqueued or being processed. Workers exit
        // once it reaches zero and the queue is drained.
        let in_flight = Arc::new(AtomicUsize::new(1));
        let files_processed = Arc::new(AtomicUsize::new(0));

        let _ = work_tx.send(WorkItem {
            dir: self.config.root.clone(),
            rel: String::new(),
        });

        let workers: Vec<_> = (0..self.config.parallelism.max(1))
            .map(|_| {
                let ctx = WorkerContext {
                    work_rx: work_rx.clone(),
                    work_tx: work_tx.clone(),
                    events: events.clone(),
                    patterns: Arc::clone(&self.patterns),
                    ignore: Arc::clone(&self.ignore),
                    in_flight: Arc::clone(&in_flight),
                    files_processed: Arc::clone(&files_processed),
                };
                thread::spawn(move || ctx.run())
            })
            .collect();
        drop(work_tx);
        drop(work_rx);

        // Supervisor: once every worker has exited, the walk is complete and
        // the summary closes the stream.
        thread::spawn(move || {
            for handle in workers {
                let _ = handle.join();
            }
            let _ = events.send(ScanEvent::Summary {
                files_processed: files_processed.load(Ordering::SeqCst),
            });
        });
    }
}

struct WorkerContext {
    work_rx: Receiver<WorkItem>,
    work_tx: Sender<WorkItem>,
    events: Sender<ScanEvent>,
    patterns: Arc<PatternSet>,
    ignore: Arc<IgnoreSpec>,
    in_flight: Arc<AtomicUsize>,
    files_processed: Arc<AtomicUsize>,
}

impl WorkerContext {
    fn run(&self) {
        loop {
            match self.work_rx.recv_timeout(IDLE_POLL) {
                Ok(item) => {
                    self.process_directory(&item);
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.in_flight.load(Ordering::SeqCst) == 0 {
                        return;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }

    fn process_directory(&self, item: &WorkItem) {
        let entries = match fs::read_dir(&item.dir) {
            Ok(entries) => entries,
            Err(err) => {
                self.send_error(display_of(item), err.to_string());
                return;
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // Entry vanished or became unreadable mid-listing.
                    self.send_error(display_of(item), err.to_string());
                    continue;
                }
            };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let rel = if item.rel.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", item.rel, name)
            };

            if file_type.is_dir() {
                children.push(ChildDir {
                    name,
                    rel,
                    path: entry.path(),
                });
            } else if !self.ignore.should_skip_file(&name) {
                self.files_processed.fetch_add(1, Ordering::SeqCst);
                match scan_file(&entry.path(), &rel, &self.patterns) {
                    Ok(Some(result)) => {
                        let _ = self.events.send(ScanEvent::Matches(result));
                    }
                    Ok(None) => {}
                    Err(err) => self.send_error(rel, err.to_string()),
                }
            }
        }

        for child in surviving_children(&self.ignore, children) {
            let item = WorkItem {
                dir: child.path,
                rel: child.rel,
            };
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            // A blocking send here can wedge the whole pool: with every
            // worker stuck producing into a full queue, nothing drains it.
            // A child that does not fit is processed inline instead, so
            // pruning stays the only way a subtree is skipped.
            match self.work_tx.try_send(item) {
                Ok(()) => {}
                Err(TrySendError::Full(item)) => {
                    self.process_directory(&item);
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                    return;
                }
            }
        }
    }

    fn send_error(&self, display_path: String, message: String) {
        let _ = self.events.send(ScanEvent::FileError {
            display_path,
            message,
        });
    }
}

/// Pruning as a pure step: the complete child listing goes in, only the
/// directories that survive the ignore lists come out.
fn surviving_children(ignore: &IgnoreSpec, children: Vec<ChildDir>) -> Vec<ChildDir> {
    children
        .into_iter()
        .filter(|child| !ignore.should_prune_dir(&child.name, &child.rel))
        .collect()
}

fn display_of(item: &WorkItem) -> String {
    if item.rel.is_empty() {
        item.dir.display().to_string()
    } else {
        item.rel.clone()
    }
}
