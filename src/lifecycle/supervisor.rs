//! Start, serve, and restart on change.

use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinError;

use crate::app::{Application, StartupError};
use crate::config::validation::validate_config;
use crate::config::{load_or_default, ConfigError, ReloadWatcher, TriviaConfig};
use crate::extension::ExtensionCatalog;
use crate::flair;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{ExitReason, Shutdown};
use crate::lifecycle::signals;

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub reload: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            bind_address: None,
            reload: true,
        }
    }
}

/// Owns the serve loop across reloads.
pub struct Supervisor {
    catalog: ExtensionCatalog,
    options: RunOptions,
}

impl Supervisor {
    pub fn new(catalog: ExtensionCatalog, options: RunOptions) -> Self {
        Self { catalog, options }
    }

    /// Load the config file (or defaults) and apply the overrides.
    pub fn load_config(&self) -> Result<TriviaConfig, StartupError> {
        let mut config = load_or_default(self.options.config_path.as_deref())?;

        if let Some(address) = &self.options.bind_address {
            config.listener.bind_address = address.clone();
        }
        if !self.options.reload {
            config.reload.enabled = false;
        }
        validate_config(&config).map_err(ConfigError::Validation)?;

        Ok(config)
    }

    /// Serve until a termination signal, rebuilding on every watched change.
    pub async fn run(self, initial: TriviaConfig) -> Result<(), StartupError> {
        let mut config = initial;
        loop {
            match self.serve(config).await? {
                ExitReason::Shutdown => return Ok(()),
                ExitReason::Reload => {
                    flair!("Reloading...");
                    config = self.load_config()?;
                }
            }
        }
    }

    async fn serve(&self, config: TriviaConfig) -> Result<ExitReason, StartupError> {
        let address = config.listener.bind_address.clone();
        let extensions = config.paths.extensions.clone();
        let reload = config.reload.clone();

        let app = Application::startup(config, &self.catalog)?;
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind {
                address: address.clone(),
                source,
            })?;

        // Dropping the watcher stops it; keep it alive for this run.
        let (_watcher, mut changes) = if reload.enabled {
            let (watcher, changes) =
                ReloadWatcher::new(&extensions, self.options.config_path.as_deref());
            (Some(watcher.run()?), Some(changes))
        } else {
            (None, None)
        };

        let shutdown = Shutdown::new();
        let server = HttpServer::new(app.into_router());
        let mut handle = tokio::spawn(server.run(listener, shutdown.signal()));
        let debounce = Duration::from_millis(reload.debounce_ms);

        let reason = tokio::select! {
            _ = signals::terminate() => ExitReason::Shutdown,
            _ = next_change(&mut changes, debounce) => ExitReason::Reload,
            result = &mut handle => {
                joined(result)?;
                return Ok(ExitReason::Shutdown);
            }
        };

        shutdown.trigger(reason);
        joined(handle.await)?;
        Ok(reason)
    }
}

/// Resolves on the first change of a burst, once the burst has settled.
async fn next_change(changes: &mut Option<mpsc::UnboundedReceiver<PathBuf>>, debounce: Duration) {
    let Some(rx) = changes.as_mut() else {
        return std::future::pending().await;
    };
    if rx.recv().await.is_none() {
        return std::future::pending().await;
    }

    tokio::time::sleep(debounce).await;
    while rx.try_recv().is_ok() {}
}

fn joined(result: Result<std::io::Result<()>, JoinError>) -> Result<(), StartupError> {
    result.map_err(std::io::Error::other)??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let supervisor = Supervisor::new(
            ExtensionCatalog::new(),
            RunOptions {
                config_path: None,
                bind_address: Some("0.0.0.0:9000".to_string()),
                reload: false,
            },
        );
        let config = supervisor.load_config().unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert!(!config.reload.enabled);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let supervisor = Supervisor::new(
            ExtensionCatalog::new(),
            RunOptions {
                bind_address: Some("not an address".to_string()),
                ..RunOptions::default()
            },
        );
        assert!(matches!(
            supervisor.load_config(),
            Err(StartupError::Config(ConfigError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_burst_of_changes_resolves_once() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut changes = Some(rx);
        tx.send(PathBuf::from("a.toml")).unwrap();
        tx.send(PathBuf::from("b.toml")).unwrap();

        next_change(&mut changes, Duration::from_millis(10)).await;
        assert!(changes.as_mut().unwrap().try_recv().is_err());
    }

    #[tokio::test]
    async fn test_no_watcher_never_reloads() {
        let mut changes = None;
        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            next_change(&mut changes, Duration::ZERO),
        )
        .await;
        assert!(waited.is_err());
    }
}
