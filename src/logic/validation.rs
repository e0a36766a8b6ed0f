//! Input validation for personalization fields.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. Required: a blank value on a required field
//! 2. Length: more characters than `character_limit`
//! 3. Pattern: a non-empty value that `validation_pattern` does not match
//!
//! Patterns are unanchored searches. A pattern that does not compile is
//! logged once and the check is skipped, so an authoring mistake never
//! blocks a customer.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use regex::Regex;

use crate::logic::tree::OptionTree;
use crate::logic::visibility::is_visible;
use crate::option::PersonalizationOption;
use crate::selection::{SelectionState, ValidationErrors};
use crate::types::VisibilityMode;

/// Compiled patterns keyed by source. `None` records a pattern that failed to compile.
static PATTERN_CACHE: LazyLock<Mutex<HashMap<String, Option<Regex>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Message shown when a pattern fails and the author supplied none
pub const DEFAULT_PATTERN_MESSAGE: &str = "Invalid format";

/// Validate one value against one option. Returns the display message on failure.
pub fn validate(option: &PersonalizationOption, value: &str) -> Option<String> {
    if option.required && value.trim().is_empty() {
        return Some(format!("{} is required", option.label));
    }

    if let Some(limit) = option.character_limit {
        if value.chars().count() > limit {
            return Some(format!("Maximum {} characters allowed", limit));
        }
    }

    if let Some(pattern) = option.validation_pattern.as_deref() {
        if !value.is_empty() {
            if let Some(regex) = compiled(&option.id, pattern) {
                if !regex.is_match(value) {
                    return Some(
                        option
                            .validation_message
                            .clone()
                            .unwrap_or_else(|| DEFAULT_PATTERN_MESSAGE.to_string()),
                    );
                }
            }
        }
    }

    None
}

/// Validate every visible option. Hidden options never carry an error.
pub fn validate_visible(
    tree: &OptionTree,
    selections: &SelectionState,
    mode: VisibilityMode,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for option in tree.iter() {
        if is_visible(tree, option, selections, mode) {
            errors.record(&option.id, validate(option, selections.get(&option.id)));
        }
    }
    errors
}

fn compiled(option_id: &str, pattern: &str) -> Option<Regex> {
    let mut cache = PATTERN_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache
        .entry(pattern.to_string())
        .or_insert_with(|| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(
                    option = option_id,
                    pattern,
                    error = %e,
                    "invalid validation pattern, skipping pattern check"
                );
                None
            }
        })
        .clone()
}
