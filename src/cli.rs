use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storefront resolver - inspect personalization options and product prices
#[derive(Parser)]
#[command(name = "storefront-resolver")]
#[command(about = "Resolve product personalization options and price displays from CMS exports")]
#[command(version)]
pub struct Cli {
    /// Resolver settings file (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Hide options whose ancestors are hidden, not just their direct parent
    #[arg(long, global = true)]
    pub ancestor_visibility: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load an option export and report what survived the content checks
    Check {
        /// Path to the option export (JSON array)
        #[arg(short, long)]
        options: PathBuf,
    },
    /// Compute visibility, errors and prices for a set of selections
    Resolve {
        /// Path to the option export (JSON array)
        #[arg(short, long)]
        options: PathBuf,
        /// Path to the current selections (JSON object or pair list)
        #[arg(short, long)]
        selections: Option<PathBuf>,
    },
    /// Apply a single field edit and print the next state
    Change {
        /// Path to the option export (JSON array)
        #[arg(short, long)]
        options: PathBuf,
        /// Path to the current selections (JSON object or pair list)
        #[arg(short, long)]
        selections: Option<PathBuf>,
        /// Option id being edited
        #[arg(long = "option")]
        option_id: String,
        /// New value (empty string clears the field)
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
    /// Format a product's storefront price
    Price {
        /// Path to the product record (JSON)
        #[arg(short, long)]
        product: PathBuf,
        /// Path to the price display config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
