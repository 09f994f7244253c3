//! Filesystem watcher for restart-on-change.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// A watcher that reports changes to the extensions directory and,
/// optionally, the configuration file.
pub struct ReloadWatcher {
    paths: Vec<PathBuf>,
    change_tx: mpsc::UnboundedSender<PathBuf>,
}

impl ReloadWatcher {
    /// Create a new ReloadWatcher.
    ///
    /// Returns the watcher and a receiver yielding the path that changed.
    pub fn new(extensions: &Path, config_file: Option<&Path>) -> (Self, mpsc::UnboundedReceiver<PathBuf>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        let mut paths = vec![extensions.to_path_buf()];
        paths.extend(config_file.map(Path::to_path_buf));

        (Self { paths, change_tx }, change_rx)
    }

    /// Start watching in a background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.change_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_relevant(&event.kind) {
                        let changed = event.paths.first().cloned().unwrap_or_default();
                        tracing::info!(path = %changed.display(), "Change detected, reloading...");
                        let _ = tx.send(changed);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for path in &self.paths {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
            tracing::info!(path = %path.display(), "Reload watcher started");
        }
        Ok(watcher)
    }
}

fn is_relevant(kind: &EventKind) -> bool {
    kind.is_modify() || kind.is_create() || kind.is_remove()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn test_access_events_are_ignored() {
        assert!(!is_relevant(&EventKind::Access(AccessKind::Any)));
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Any)));
    }

    #[test]
    fn test_config_file_is_watched_when_given() {
        let (watcher, _rx) = ReloadWatcher::new(Path::new("extensions"), Some(Path::new("trivia.toml")));
        assert_eq!(watcher.paths, vec![PathBuf::from("extensions"), PathBuf::from("trivia.toml")]);

        let (watcher, _rx) = ReloadWatcher::new(Path::new("extensions"), None);
        assert_eq!(watcher.paths.len(), 1);
    }
}
