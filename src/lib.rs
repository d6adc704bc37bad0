pub mod cli;
pub mod core;
pub mod providers;

use crate::core::FormController;
use crate::core::config::AppConfig;
use crate::core::conversion::Direction;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Currencies {
        date: Option<String>,
    },
    Convert {
        direction: Direction,
        date: String,
        currency: Option<String>,
        amount: String,
    },
    Interactive,
    Status,
}

/// Wires the HTTP adapters from `config` into a fresh form.
pub fn build_form(config: &AppConfig) -> Result<FormController> {
    let catalog = providers::HttpCatalogClient::new(config.catalog_url())
        .context("Failed to create catalog client")?;
    let conversion = providers::HttpConversionClient::new(config.conversion_url())
        .context("Failed to create conversion client")?;
    Ok(FormController::new(Arc::new(catalog), Arc::new(conversion)))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Status => cli::status::run(&config).await,
        AppCommand::Currencies { date } => {
            cli::currencies::run(&build_form(&config)?, date.as_deref()).await
        }
        AppCommand::Convert {
            direction,
            date,
            currency,
            amount,
        } => {
            let form = build_form(&config)?;
            cli::convert::run(&form, direction, &date, currency.as_deref(), &amount).await
        }
        AppCommand::Interactive => cli::interactive::run(&build_form(&config)?).await,
    }
}
