#![allow(missing_docs)]

mod cli;
mod commands;
mod render;

use std::env;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vitrine_config::{BASE_URL_VAR, CONFIG_PATH_VAR, ConfigLoad, ConfigLoader};

use cli::{Cli, Command};

fn load_config(cli: &Cli) -> Result<ConfigLoad> {
    let config_path = cli
        .config
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());
    let base_url = cli.base_url.clone();

    ConfigLoader::new()
        .with_env_lookup(move |name| match name {
            CONFIG_PATH_VAR if config_path.is_some() => config_path.clone(),
            BASE_URL_VAR if base_url.is_some() => base_url.clone(),
            _ => env::var(name).ok(),
        })
        .load()
        .context("failed to load vitrine configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let load = load_config(&cli)?;

    // RUST_LOG wins over the configured filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&load.config.log.filter))
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = &load.config;
    match &cli.command {
        Command::Categories { from, root } => {
            commands::categories(config, from.as_deref(), *root).await
        }
        Command::Compile {
            facets,
            categories_file,
            live,
            ceiling,
            json,
        } => {
            commands::compile(
                config,
                facets,
                categories_file.as_deref(),
                *live,
                *ceiling,
                *json,
            )
            .await
        }
        Command::Browse {
            facets,
            page,
            page_size,
            json,
        } => commands::browse(config, facets, *page, *page_size, *json).await,
        Command::Config => commands::show_config(&load),
    }
}
