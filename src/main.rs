//! Storefront resolver - command line entry point
//!
//! Loads CMS exports from disk and prints resolver output as JSON.

mod cli;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use storefront_resolver::{
    format_product_price_with_unit, load_options_from_file, PriceConfig, Product, Resolver,
    ResolverSettings, SelectionState, ValidationErrors, VisibilityMode,
};

/// Initialize the logger with appropriate settings
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .init();
}

fn main() {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.settings {
        Some(path) => {
            info!("Loading resolver settings from {:?}", path);
            ResolverSettings::load_from_file(path)?
        }
        None => ResolverSettings::default(),
    };
    if cli.ancestor_visibility {
        settings.visibility_mode = VisibilityMode::AncestorChain;
    }
    debug!(mode = %settings.visibility_mode, "settings ready");

    match cli.command {
        Commands::Check { options } => {
            let resolver = load_resolver(&options, settings)?;
            let tree = resolver.tree();
            info!("✓ {} option(s) loaded from {:?}", tree.len(), options);
            print_json(&tree.summary())
        }
        Commands::Resolve {
            options,
            selections,
        } => {
            let resolver = load_resolver(&options, settings)?;
            let selections = load_selections(selections.as_deref())?;
            print_json(&resolver.resolve(&selections))
        }
        Commands::Change {
            options,
            selections,
            option_id,
            value,
        } => {
            let resolver = load_resolver(&options, settings)?;
            if !resolver.tree().contains(&option_id) {
                return Err(storefront_resolver::ResolverError::unknown_option(option_id).into());
            }
            let selections = load_selections(selections.as_deref())?;
            let outcome = resolver.on_change_with(
                &selections,
                &ValidationErrors::new(),
                &option_id,
                &value,
                |id, value| info!(option = id, value, "value changed"),
            );
            print_json(&outcome)
        }
        Commands::Price { product, config } => {
            let product: Product = read_json(&product)?;
            let config: PriceConfig = match config {
                Some(path) => read_json(&path)?,
                None => PriceConfig::default(),
            };
            let display =
                format_product_price_with_unit(&product, &config, &settings.default_unit_label);
            print_json(&display)
        }
    }
}

fn load_resolver(path: &Path, settings: ResolverSettings) -> Result<Resolver> {
    info!("Loading personalization options from {:?}", path);
    let options = load_options_from_file(path)
        .with_context(|| format!("Failed to load options from {:?}", path))?;
    Ok(Resolver::new(options, settings))
}

fn load_selections(path: Option<&Path>) -> Result<SelectionState> {
    match path {
        Some(path) => read_json(path),
        None => Ok(SelectionState::new()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
