//! Storefront Resolver Library
//!
//! Product personalization options (conditional fields, validation,
//! surcharges) and storefront price display for CMS-driven catalogs.

pub mod config_file;
pub mod error;
pub mod logic;
pub mod option;
pub mod product_price;
pub mod selection;
pub mod types;

// Re-export main types for convenience
pub use config_file::ResolverSettings;
pub use error::{ResolverError, Result};
pub use option::{
    load_options, load_options_from_file, PersonalizationOption, RawPersonalizationOption,
    SelectChoice,
};
pub use product_price::{
    format_product_price, format_product_price_with_unit, format_usd, minimum_variant_price,
    PriceConfig, PriceDisplay, Product, Variant,
};
pub use selection::{SelectionPair, SelectionState, ValidationErrors};
pub use types::{FieldType, PersonalizationType, PriceType, PricingType, VisibilityMode};

// Resolver pieces
pub use logic::pricing::{price_for, total_price};
pub use logic::resolver::{ChangeOutcome, PersonalizationLine, Resolution, Resolver};
pub use logic::tree::{OptionTree, TreeSummary};
pub use logic::validation::{validate, validate_visible};
pub use logic::visibility::is_visible;
