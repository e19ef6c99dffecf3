mod cli;
mod output;

use crate::cli::{Command, CLI};
use crate::output::Printer;
use anyhow::Context;
use clap::Parser;
use tinylink_generator::RandomGenerator;
use tinylink_registry::{AllocateParams, LinkRegistry, Registry};
use tinylink_storage::{SqliteLinkStore, SqliteSettings};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may be set directly.
    dotenvy::dotenv().ok();

    let config = CLI::parse();
    tinylink_telemetry::init(config.log_format)?;

    let settings = SqliteSettings::from_database_url(config.database_url.as_deref())?;
    debug!(
        location = %settings.location,
        log_format = %config.log_format,
        "starting tinylink"
    );

    let store = SqliteLinkStore::connect(&settings)
        .await
        .with_context(|| format!("failed to open link store at {}", settings.location))?;
    let registry = LinkRegistry::new(store, RandomGenerator::new());
    let printer = Printer::new(config.json, config.base_url);

    match config.command {
        Command::Add { target_url, code } => {
            let params = AllocateParams {
                target_url,
                desired_code: code,
            };
            let link = registry.allocate(params).await?;
            printer.link(&link)?;
        }
        Command::Show { code } => {
            let link = registry.resolve(&code).await?;
            printer.link(&link)?;
        }
        Command::List => {
            let links = registry.list().await?;
            printer.links(&links)?;
        }
        Command::Remove { code } => {
            registry.remove(&code).await?;
            printer.removed(&code)?;
        }
        Command::Visit { code } => {
            let link = registry.visit(&code).await?;
            printer.target(&link)?;
        }
    }

    registry.store().close().await;
    Ok(())
}
