//! Product-level price display
//!
//! Decides whether and how a product's price appears on the storefront.
//!
//! # Base price
//!
//! The first positive amount of:
//! 1. `PriceConfig::override_price`
//! 2. the first variant's price, when variants are enabled
//! 3. the product's flat price
//!
//! No positive amount means the price is not shown.
//!
//! # Presentation
//!
//! | Price type | Display |
//! |------------|---------|
//! | `hidden`   | not shown |
//! | `custom`   | literal text (falls back to the bare price when blank) |
//! | `from`     | `from $10` |
//! | `starting` | `starting at $10` |
//! | `unit`     | `$10 each` |
//! | `auto`     | `from $10` with more than one variant, `$10` otherwise |
//! | `fixed`    | `$10` |

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::option::{lenient_flag, lenient_i64, lenient_id, lenient_text, lenient_vec};
use crate::types::PriceType;

/// Unit label used when neither the price config nor settings supply one
pub const DEFAULT_UNIT_LABEL: &str = "each";

/// Purchasable variant of a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Variant {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Price in cents
    #[serde(deserialize_with = "lenient_i64")]
    pub price: Option<i64>,
}

impl Variant {
    pub fn priced(cents: i64) -> Self {
        Self {
            price: Some(cents),
            ..Self::default()
        }
    }
}

/// The pricing-relevant slice of a catalog product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    /// Flat price in cents
    #[serde(deserialize_with = "lenient_i64")]
    pub price: Option<i64>,
    #[serde(deserialize_with = "lenient_flag")]
    pub enable_variants: bool,
    #[serde(deserialize_with = "lenient_vec")]
    pub variants: Vec<Variant>,
}

/// Author-controlled display settings for one product's price
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceConfig {
    #[serde(deserialize_with = "lenient_price_type")]
    pub price_type: PriceType,
    #[serde(deserialize_with = "lenient_text")]
    pub custom_text: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub override_price: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub unit_label: Option<String>,
}

impl PriceConfig {
    pub fn of_type(price_type: PriceType) -> Self {
        Self {
            price_type,
            ..Self::default()
        }
    }
}

/// What the storefront renders for a price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDisplay {
    pub display: String,
    pub should_show: bool,
    pub is_custom: bool,
}

impl PriceDisplay {
    fn hidden() -> Self {
        Self {
            display: String::new(),
            should_show: false,
            is_custom: false,
        }
    }

    fn shown(display: String) -> Self {
        Self {
            display,
            should_show: true,
            is_custom: false,
        }
    }
}

/// Format a product price with the default unit label
pub fn format_product_price(product: &Product, config: &PriceConfig) -> PriceDisplay {
    format_product_price_with_unit(product, config, DEFAULT_UNIT_LABEL)
}

/// Format a product price; `default_unit` applies when the config has no unit label
pub fn format_product_price_with_unit(
    product: &Product,
    config: &PriceConfig,
    default_unit: &str,
) -> PriceDisplay {
    if config.price_type == PriceType::Hidden {
        return PriceDisplay::hidden();
    }

    if config.price_type == PriceType::Custom {
        if let Some(text) = config.custom_text.as_deref().filter(|t| !t.trim().is_empty()) {
            return PriceDisplay {
                display: text.to_string(),
                should_show: true,
                is_custom: true,
            };
        }
    }

    let Some(base) = base_price(product, config) else {
        tracing::debug!(product = ?product.id, "no positive price, hiding");
        return PriceDisplay::hidden();
    };
    let amount = format_usd(base);

    let display = match config.price_type {
        PriceType::From => format!("from {}", amount),
        PriceType::Starting => format!("starting at {}", amount),
        PriceType::Unit => {
            let unit = config
                .unit_label
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(default_unit);
            format!("{} {}", amount, unit)
        }
        PriceType::Auto if product.variants.len() > 1 => format!("from {}", amount),
        PriceType::Auto | PriceType::Fixed | PriceType::Custom | PriceType::Hidden => amount,
    };
    PriceDisplay::shown(display)
}

fn base_price(product: &Product, config: &PriceConfig) -> Option<i64> {
    let variant_price = if product.enable_variants {
        product.variants.first().and_then(|v| v.price)
    } else {
        None
    };
    [config.override_price, variant_price, product.price]
        .into_iter()
        .flatten()
        .find(|&cents| cents > 0)
}

/// Lowest positive variant price, else the product's flat price
pub fn minimum_variant_price(product: &Product) -> Option<i64> {
    product
        .variants
        .iter()
        .filter_map(|v| v.price)
        .filter(|&cents| cents > 0)
        .min()
        .or(product.price)
}

/// US dollars with thousands separators and 0-2 fraction digits.
///
/// `1000` → `$10`, `1050` → `$10.5`, `123456` → `$1,234.56`
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_formatted_string(&Locale::en);
    let fraction = abs % 100;

    if fraction == 0 {
        format!("{}${}", sign, dollars)
    } else if fraction % 10 == 0 {
        format!("{}${}.{}", sign, dollars, fraction / 10)
    } else {
        format!("{}${}.{:02}", sign, dollars, fraction)
    }
}

fn lenient_price_type<'de, D>(deserializer: D) -> std::result::Result<PriceType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(PriceType::from_cms(value.as_deref()))
}
