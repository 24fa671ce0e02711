//! Headless 2048 server (default binary).
//!
//! Owns one game and exposes it to external agents over the line-delimited
//! JSON adapter. Configuration comes from `TWENTY48_*` environment variables;
//! log filtering from `TWENTY48_LOG` (default `info`).

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use twenty48::adapter::{runtime, ServerConfig, ServerState};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("TWENTY48_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if ServerState::is_disabled() {
        info!("adapter disabled via TWENTY48_DISABLED");
        return Ok(());
    }

    let config = ServerConfig::from_env();
    info!(host = %config.host, port = config.port, seed = config.seed, "starting twenty48-server");

    tokio::select! {
        result = runtime::serve(config, None) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}
