use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use regproxy::{Config, RegistryBackendFactory, RegistryProxy};

#[derive(Parser)]
struct Cli {
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .compact()
        .init();

    // load configuration
    let config = match cli.config_file {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };

    let factory = RegistryBackendFactory::new(config.credentials_by_host())?;
    let router = RegistryProxy::new(factory).router();

    // run HTTP server
    tracing::info!("listening on {}", config.listen_address);
    axum::Server::bind(&config.listen_address)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}
