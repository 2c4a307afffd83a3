use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use treesnap_cli::{
    cli::{Cli, Commands},
    commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level: LevelFilter = match (cli.log_level, cli.verbose) {
        (Some(level), _) => level.into(),
        (None, true) => LevelFilter::DEBUG,
        (None, false) => LevelFilter::INFO,
    };
    let env_filter = format!(
        "treesnap_cli={level},treesnap_watch={level},treesnap_core={level}",
        level = level
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    let workspace = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Generate => commands::generate::execute(workspace, cli.config).await?,

        Commands::Watch { trigger } => {
            commands::watch::execute(workspace, cli.config, trigger.into()).await?
        }
    }

    Ok(())
}
