mod cli;

use anyhow::Result;
use clap::Parser;
use comanda_client::{ClientConfig, PushConfig, logger};

use cli::Cli;
use cli::commands::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Environment: .env, then CLI overrides
    dotenv::dotenv().ok();
    let args = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.backend_url {
        config = ClientConfig {
            backend_url: url.trim_end_matches('/').to_string(),
            ..config
        };
    }
    if let Some(dir) = args.session_dir {
        config = config.with_session_dir(dir);
    }
    if let Some(level) = args.log {
        config = config.with_log_level(level);
    }
    if args.wan {
        config = config.with_push(PushConfig::wan());
    }

    // 2. Logging
    let _log_guard = logger::init_logger(&config.log_level, config.log_dir.as_deref());
    tracing::debug!(backend = %config.backend_url, "comanda starting");

    // 3. Run
    let app = App::new(config)?;
    if let Err(e) = app.run(args.command).await {
        tracing::debug!("Command failed: {e:#}");
        return Err(e);
    }
    Ok(())
}
