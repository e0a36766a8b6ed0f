//! Type-safe discriminants for personalization options and price display
//!
//! CMS content arrives as loose strings. These enums are the only shapes the
//! resolver works with; parsing happens once at the content boundary.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Input control a personalization field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum FieldType {
    /// Single-line text
    #[default]
    #[strum(to_string = "text")]
    Text,
    /// Multi-line text
    #[strum(to_string = "textarea", serialize = "multiline")]
    Textarea,
    #[strum(to_string = "select", serialize = "dropdown")]
    Select,
    #[strum(to_string = "date")]
    Date,
    /// Hex color string such as `#ff8800`
    #[strum(to_string = "color", serialize = "colour")]
    Color,
}

impl FieldType {
    /// Free-form text fields, the only ones revalidated on every keystroke
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Text | Self::Textarea)
    }

    /// Fields priced per choice and able to drive child visibility cascades
    pub fn is_select(&self) -> bool {
        matches!(self, Self::Select)
    }
}

/// How a non-select field contributes to price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    /// Fixed surcharge whenever the field holds a value
    #[strum(serialize = "flat")]
    Flat,
    /// Price comes from the chosen select entry (or nothing)
    #[default]
    #[strum(serialize = "per_choice")]
    PerChoice,
    /// A pricing type the CMS allows but nothing here knows how to price.
    /// Always contributes zero.
    #[strum(serialize = "unsupported")]
    Unsupported,
}

impl PricingType {
    /// Map the CMS `pricingType` string. Absent means per-choice.
    pub fn from_cms(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::PerChoice,
            Some(v) if v.eq_ignore_ascii_case("flat") => Self::Flat,
            Some(v) if v.eq_ignore_ascii_case("per_choice") || v.eq_ignore_ascii_case("per-choice") => {
                Self::PerChoice
            }
            Some(other) => {
                tracing::debug!(pricing_type = other, "unrecognised pricing type, priced at zero");
                Self::Unsupported
            }
        }
    }
}

/// Rendering group for an option. Carries no resolver logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PersonalizationType {
    #[default]
    Simple,
    Complex,
    Standalone,
}

/// How a product price is presented on the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PriceType {
    /// "from" when the product has several variants, bare price otherwise
    #[default]
    Auto,
    /// Bare price
    Fixed,
    From,
    Starting,
    /// Price followed by a unit label ("each")
    Unit,
    /// Literal author-supplied text
    Custom,
    Hidden,
}

impl PriceType {
    /// Map the CMS `priceType` string, degrading unknown values to `Auto`.
    pub fn from_cms(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Auto,
            Some(v) => v.parse().unwrap_or_else(|_| {
                tracing::debug!(price_type = v, "unrecognised price type, using auto");
                Self::Auto
            }),
        }
    }
}

/// Whether a child's visibility depends on its whole ancestor chain.
///
/// `DirectParent` only looks at the parent's raw value, so a grandchild can
/// show up under a hidden parent when the stale value still matches.
/// `AncestorChain` also requires every ancestor to be visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VisibilityMode {
    #[default]
    DirectParent,
    AncestorChain,
}
