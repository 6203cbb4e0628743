pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use clap::{CommandFactory, Parser};
pub use config::Config;
use config::LogFormat;
use state::SharedState;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    let cli = cli::Cli::parse();
    let Some(command) = cli.command else {
        cli::Cli::command().print_help()?;
        return Ok(());
    };

    let state = SharedState::new(&config).await?;

    if config.demo.seed_on_start
        && services::seed_demo_data(&state.store, state.clock.as_ref()).await?
    {
        info!("Seeded demo data into fresh storage");
    }

    debug!(database = %config.general.database_path, "Dispatching command");
    cli::dispatch(&state, command).await
}
