//! Personalization option records and the CMS content boundary.
//!
//! The CMS hands over option records authored by non-engineers. Every record
//! goes through [`PersonalizationOption::from_raw`] exactly once; anything
//! that does not survive that pass is treated as inactive and never reaches
//! the resolver.
//!
//! Ids may arrive as strings, numbers, or populated relation objects
//! (`{"id": ...}`). Numbers may arrive as JSON numbers or numeric strings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::{FieldType, PersonalizationType, PricingType};

/// One entry of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectChoice {
    pub value: String,
    pub label: String,
    /// Surcharge in cents
    pub additional_price: i64,
}

impl SelectChoice {
    pub fn new(value: &str, label: &str, additional_price: i64) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            additional_price,
        }
    }
}

/// A validated personalization field attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationOption {
    pub id: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub character_limit: Option<usize>,
    pub validation_pattern: Option<String>,
    pub validation_message: Option<String>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub display_order: i64,
    pub parent_option_id: Option<String>,
    /// Comma-separated parent values that make this option visible
    pub show_when_parent_value: Option<String>,
    pub personalization_type: PersonalizationType,
    pub pricing_type: PricingType,
    /// Flat surcharge in cents, used by non-select fields
    pub additional_price: i64,
    /// Ordered entries, only meaningful for select fields
    pub choices: Vec<SelectChoice>,
}

impl PersonalizationOption {
    /// Create an optional, unpriced root field
    pub fn new(id: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            character_limit: None,
            validation_pattern: None,
            validation_message: None,
            placeholder: None,
            help_text: None,
            display_order: 0,
            parent_option_id: None,
            show_when_parent_value: None,
            personalization_type: PersonalizationType::default(),
            pricing_type: PricingType::default(),
            additional_price: 0,
            choices: Vec::new(),
        }
    }

    /// Attach this option under `parent`, shown when the parent holds one of `values`
    pub fn with_parent(mut self, parent: &str, values: &str) -> Self {
        self.parent_option_id = Some(parent.to_string());
        self.show_when_parent_value = Some(values.to_string());
        self
    }

    pub fn with_choices(mut self, choices: Vec<SelectChoice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_character_limit(mut self, limit: usize) -> Self {
        self.character_limit = Some(limit);
        self
    }

    pub fn with_pattern(mut self, pattern: &str, message: Option<&str>) -> Self {
        self.validation_pattern = Some(pattern.to_string());
        self.validation_message = message.map(str::to_string);
        self
    }

    pub fn with_flat_price(mut self, cents: i64) -> Self {
        self.pricing_type = PricingType::Flat;
        self.additional_price = cents;
        self
    }

    pub fn with_display_order(mut self, order: i64) -> Self {
        self.display_order = order;
        self
    }

    /// Trimmed, non-empty members of `show_when_parent_value`
    pub fn visibility_values(&self) -> Vec<&str> {
        self.show_when_parent_value
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up a select entry by its value
    pub fn choice(&self, value: &str) -> Option<&SelectChoice> {
        self.choices.iter().find(|c| c.value == value)
    }

    /// Convert a raw CMS record, or `None` when it must be treated as inactive.
    ///
    /// Dropped records:
    /// - `active: false`
    /// - missing or blank `id` / `label`
    /// - a `fieldType` outside the known set
    pub fn from_raw(raw: RawPersonalizationOption) -> Option<Self> {
        let id = match raw.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                tracing::debug!(label = ?raw.label, "dropping option without an id");
                return None;
            }
        };

        if !raw.active.unwrap_or(true) {
            tracing::debug!(option = %id, "dropping inactive option");
            return None;
        }

        let label = match raw.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => {
                tracing::debug!(option = %id, "dropping option without a label");
                return None;
            }
        };

        let field_type = match raw.field_type.as_deref().map(str::trim) {
            Some(ft) => match ft.parse::<FieldType>() {
                Ok(field_type) => field_type,
                Err(_) => {
                    tracing::warn!(option = %id, field_type = ft, "dropping option with unknown field type");
                    return None;
                }
            },
            None => {
                tracing::debug!(option = %id, "dropping option without a field type");
                return None;
            }
        };

        let choices = if field_type.is_select() {
            raw.options
                .into_iter()
                .filter_map(|choice| {
                    let value = choice.value.map(|v| v.trim().to_string())?;
                    if value.is_empty() {
                        return None;
                    }
                    let label = choice
                        .label
                        .map(|l| l.trim().to_string())
                        .filter(|l| !l.is_empty())
                        .unwrap_or_else(|| value.clone());
                    Some(SelectChoice {
                        value,
                        label,
                        additional_price: choice.additional_price.unwrap_or(0),
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        let personalization_type = raw
            .personalization_type
            .as_deref()
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or_default();

        Some(Self {
            id,
            label,
            field_type,
            required: raw.required.unwrap_or(false),
            character_limit: raw
                .character_limit
                .and_then(|limit| usize::try_from(limit).ok())
                .filter(|limit| *limit > 0),
            validation_pattern: non_blank(raw.validation_pattern),
            validation_message: non_blank(raw.validation_message),
            placeholder: non_blank(raw.placeholder),
            help_text: non_blank(raw.help_text),
            display_order: raw.display_order.unwrap_or(0),
            parent_option_id: raw
                .parent_option_id
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            show_when_parent_value: non_blank(raw.show_when_parent_value),
            personalization_type,
            pricing_type: PricingType::from_cms(raw.pricing_type.as_deref()),
            additional_price: raw.additional_price.unwrap_or(0),
            choices,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Option record exactly as the CMS exports it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPersonalizationOption {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub label: Option<String>,
    pub field_type: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub required: Option<bool>,
    #[serde(deserialize_with = "lenient_i64")]
    pub character_limit: Option<i64>,
    pub validation_pattern: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub validation_message: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub placeholder: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub help_text: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub display_order: Option<i64>,
    #[serde(deserialize_with = "lenient_id")]
    pub parent_option_id: Option<String>,
    pub show_when_parent_value: Option<String>,
    pub personalization_type: Option<String>,
    pub pricing_type: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub additional_price: Option<i64>,
    /// Select entries; entries that fail to decode are skipped one by one
    #[serde(deserialize_with = "lenient_vec")]
    pub options: Vec<RawSelectChoice>,
    #[serde(deserialize_with = "lenient_bool")]
    pub active: Option<bool>,
}

/// Select entry exactly as the CMS exports it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSelectChoice {
    #[serde(deserialize_with = "lenient_id")]
    pub value: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub additional_price: Option<i64>,
}

/// Parse a CMS export (a JSON array of option records, or `null`).
///
/// Malformed JSON is an error. Records that fail to deserialize or fail the
/// boundary pass are skipped.
pub fn load_options(json: &str) -> Result<Vec<PersonalizationOption>> {
    let records: Option<Vec<Value>> = serde_json::from_str(json)?;
    Ok(convert_records(records.unwrap_or_default()))
}

/// Read and parse a CMS export from disk
pub fn load_options_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<PersonalizationOption>> {
    let content = fs::read_to_string(path)?;
    load_options(&content)
}

/// Run the boundary pass over already-parsed records
pub fn convert_records(records: Vec<Value>) -> Vec<PersonalizationOption> {
    let total = records.len();
    let options: Vec<PersonalizationOption> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            match serde_json::from_value::<RawPersonalizationOption>(record) {
                Ok(raw) => PersonalizationOption::from_raw(raw),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed option record");
                    None
                }
            }
        })
        .collect();

    if options.len() != total {
        tracing::debug!(kept = options.len(), dropped = total - options.len(), "filtered option records");
    }
    options
}

// ============================================================================
// Lenient field decoders
// ============================================================================

pub(crate) fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Populated relationship
        Value::Object(map) => map.get("id").and_then(id_from_value),
        _ => None,
    }
}

pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Display text: strings as-is, numbers and booleans stringified, and a
/// localized object (`{"en": "Mug"}`) reduced to its `en` entry, else the
/// first string value by key
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_from_value))
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map
            .get("en")
            .and_then(Value::as_str)
            .or_else(|| map.values().find_map(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

/// Array of records where each entry decodes on its own. `null` or a
/// non-array becomes empty; undecodable entries are dropped.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::debug!(index, error = %e, "skipping malformed list entry");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Boolean flag where `null` or an unreadable value means `false`
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_bool(deserializer)?.unwrap_or(false))
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}
