//! File watcher service for watch mode.
//!
//! Monitors an input directory for new or changed figures and broadcasts
//! debounced batches of paths to the batch processor.

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Event sent when files change
#[derive(Debug, Clone, PartialEq)]
pub struct FileChangeEvent {
    /// Paths that changed, sorted and deduplicated
    pub paths: Vec<PathBuf>,
}

/// File watcher that monitors one input directory (non-recursive)
pub struct FileWatcher {
    /// Broadcast sender for file change events
    sender: broadcast::Sender<FileChangeEvent>,
    /// Handle to the watcher (kept alive)
    _watcher: RecommendedWatcher,
}

/// True for `.svg`/`.pdf` files outside `exclude` (the output directory).
pub fn is_watched_path(path: &Path, exclude: Option<&Path>) -> bool {
    let is_figure = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("pdf"));
    is_figure && !exclude.is_some_and(|dir| path.starts_with(dir))
}

impl FileWatcher {
    /// Start watching `watch_dir`. Must be called inside a tokio runtime.
    pub fn new(
        watch_dir: &Path,
        exclude_dir: Option<PathBuf>,
        debounce: Duration,
    ) -> Result<Self, notify::Error> {
        let (sender, _) = broadcast::channel(16);
        let (tx, rx) = mpsc::channel::<PathBuf>(100);

        tokio::spawn(debounce_paths(rx, sender.clone(), debounce));

        // notify may report canonical paths, so compare against both forms
        let excludes: Vec<PathBuf> = exclude_dir
            .into_iter()
            .flat_map(|dir| {
                let canonical = dir.canonicalize().ok();
                std::iter::once(dir).chain(canonical)
            })
            .collect();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for path in event.paths {
                        let excluded = excludes.iter().any(|dir| path.starts_with(dir));
                        if !excluded && is_watched_path(&path, None) {
                            let _ = tx.blocking_send(path);
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "File watch error"),
            },
            Config::default(),
        )?;

        watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %watch_dir.display(), "File watcher started");

        Ok(Self {
            sender,
            _watcher: watcher,
        })
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent> {
        self.sender.subscribe()
    }
}

/// Collect paths until `window` passes with no new path, then emit them
/// as one event. Ends when the raw channel closes.
async fn debounce_paths(
    mut rx: mpsc::Receiver<PathBuf>,
    sender: broadcast::Sender<FileChangeEvent>,
    window: Duration,
) {
    while let Some(first) = rx.recv().await {
        let mut pending = BTreeSet::from([first]);

        loop {
            match tokio::time::timeout(window, rx.recv()).await {
                Ok(Some(path)) => {
                    pending.insert(path);
                }
                Ok(None) | Err(_) => break,
            }
        }

        let paths: Vec<PathBuf> = pending.into_iter().collect();
        tracing::debug!(paths = ?paths, "Files changed (debounced)");
        let _ = sender.send(FileChangeEvent { paths });
    }
}
