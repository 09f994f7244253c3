//! Trivia server.
//!
//! # Architecture Overview
//!
//! ```text
//!     extensions/*.toml ──▶ ExtensionLoader ──▶ handler groups ──┐
//!                                                                ▼
//!     Client ──▶ HttpServer ──▶ request id ──▶ Router ──▶ access log ──▶ handler
//!                                                │
//!                                                ├── /assets, /bin (static files)
//!                                                ├── /docs (route index)
//!                                                └── fallback 404
//!
//!     ReloadWatcher ──▶ Supervisor: drain, rebuild, serve again
//! ```

use clap::Parser;
use std::path::PathBuf;

use trivia_server::lifecycle::RunOptions;
use trivia_server::observability::logging;
use trivia_server::{ExtensionCatalog, Supervisor};

#[derive(Parser, Debug)]
#[command(name = "trivia-server", version, about = "Trivia HTTP service")]
struct Cli {
    /// TOML config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding `listener.bind_address`
    #[arg(short, long)]
    bind: Option<String>,

    /// Do not restart when extensions or the config file change
    #[arg(long)]
    no_reload: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let supervisor = Supervisor::new(
        ExtensionCatalog::builtin(),
        RunOptions {
            config_path: cli.config,
            bind_address: cli.bind,
            reload: !cli.no_reload,
        },
    );

    let config = supervisor.load_config()?;
    let _guard = logging::init(&config.logging)?;

    if let Err(e) = supervisor.run(config).await {
        tracing::error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}
