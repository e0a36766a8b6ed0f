//! Personalization resolver
//!
//! Ties the pure pieces together for one product's option tree.
//!
//! # Design
//!
//! - **Single source of truth**: the caller owns `SelectionState` and
//!   `ValidationErrors`. The resolver never keeps a copy between calls.
//! - **Reducer-style changes**: [`Resolver::on_change`] takes the current
//!   state plus one edit and returns the next state.
//! - **Pure logic**: No I/O. The tree is built once per product.
//!
//! # Change Rules
//!
//! | Changed field | Effect |
//! |---------------|--------|
//! | any           | Value stored (empty removes it) |
//! | text/textarea | Revalidated immediately, error set or cleared |
//! | select        | Set descendants hidden by this edit are cleared, recursively |
//! | select        | Descendants already hidden before the edit keep their values |
//! | same value    | Nothing happens |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config_file::ResolverSettings;
use crate::logic::pricing::{price_for, price_map, sum_prices};
use crate::logic::tree::OptionTree;
use crate::logic::validation::{validate, validate_visible};
use crate::logic::visibility::{is_visible, visibility_map};
use crate::option::PersonalizationOption;
use crate::selection::{SelectionState, ValidationErrors};
use crate::types::VisibilityMode;

/// Everything the UI needs to render the personalization form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Visibility of every option in the tree
    pub visible: BTreeMap<String, bool>,
    /// Errors for visible options only
    pub errors: ValidationErrors,
    /// Surcharge per visible option, in cents
    pub prices: BTreeMap<String, i64>,
    /// Saturating sum of `prices`
    pub total: i64,
}

/// Next state after a single field edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOutcome {
    pub selections: SelectionState,
    pub errors: ValidationErrors,
    /// Options reset to empty because the edit hid them, in tree order
    pub cleared: Vec<String>,
}

/// One personalization line for the cart / order payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationLine {
    pub option_id: String,
    pub label: String,
    pub value: String,
    /// Choice label for select fields, the raw value otherwise
    pub display_value: String,
    pub additional_price: i64,
}

/// Resolver over one product's option tree
#[derive(Debug, Clone)]
pub struct Resolver {
    tree: OptionTree,
    settings: ResolverSettings,
}

impl Resolver {
    pub fn new(options: Vec<PersonalizationOption>, settings: ResolverSettings) -> Self {
        Self {
            tree: OptionTree::build(options),
            settings,
        }
    }

    pub fn tree(&self) -> &OptionTree {
        &self.tree
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    fn mode(&self) -> VisibilityMode {
        self.settings.visibility_mode
    }

    /// Visibility of a single option; unknown ids are hidden
    pub fn is_visible(&self, option_id: &str, selections: &SelectionState) -> bool {
        self.tree
            .get(option_id)
            .is_some_and(|option| is_visible(&self.tree, option, selections, self.mode()))
    }

    /// Full recomputation of visibility, errors and prices
    pub fn resolve(&self, selections: &SelectionState) -> Resolution {
        let mode = self.mode();
        let prices = price_map(&self.tree, selections, mode);
        let total = sum_prices(prices.values());
        Resolution {
            visible: visibility_map(&self.tree, selections, mode),
            errors: validate_visible(&self.tree, selections, mode),
            prices,
            total,
        }
    }

    /// Apply one edit and return the next state.
    ///
    /// Unknown option ids leave the state untouched.
    pub fn on_change(
        &self,
        selections: &SelectionState,
        errors: &ValidationErrors,
        option_id: &str,
        value: &str,
    ) -> ChangeOutcome {
        let unchanged = || ChangeOutcome {
            selections: selections.clone(),
            errors: errors.clone(),
            cleared: Vec::new(),
        };

        let Some(option) = self.tree.get(option_id) else {
            tracing::warn!(option = option_id, "change for unknown option ignored");
            return unchanged();
        };

        if selections.get(option_id) == value {
            tracing::debug!(option = option_id, "value unchanged, nothing to do");
            return unchanged();
        }

        let mut next = selections.clone();
        let mut next_errors = errors.clone();
        next.set(option_id, value);

        if option.field_type.is_textual() {
            next_errors.record(option_id, validate(option, value));
        }

        let mut cleared = Vec::new();
        if option.field_type.is_select() {
            // Depth-first, so a cleared parent hides its own children in turn
            for descendant in self.tree.descendants_of(option_id) {
                let was_visible = is_visible(&self.tree, descendant, selections, self.mode());
                if !was_visible || is_visible(&self.tree, descendant, &next, self.mode()) {
                    continue;
                }
                next_errors.clear(&descendant.id);
                if !next.get(&descendant.id).is_empty() {
                    next.clear(&descendant.id);
                    cleared.push(descendant.id.clone());
                }
            }
        }

        if !cleared.is_empty() {
            tracing::debug!(option = option_id, cleared = ?cleared, "cleared hidden descendants");
        }

        ChangeOutcome {
            selections: next,
            errors: next_errors,
            cleared,
        }
    }

    /// [`Resolver::on_change`] with a notification per changed value: first the
    /// edited option, then every cascaded clear with an empty value.
    pub fn on_change_with<F>(
        &self,
        selections: &SelectionState,
        errors: &ValidationErrors,
        option_id: &str,
        value: &str,
        mut notify: F,
    ) -> ChangeOutcome
    where
        F: FnMut(&str, &str),
    {
        let outcome = self.on_change(selections, errors, option_id, value);
        if outcome.selections != *selections {
            notify(option_id, value);
            for id in &outcome.cleared {
                notify(id, "");
            }
        }
        outcome
    }

    /// Personalization lines for the order payload: visible options with a
    /// non-blank value, in tree order
    pub fn line_items(&self, selections: &SelectionState) -> Vec<PersonalizationLine> {
        self.tree
            .iter()
            .filter(|option| selections.is_set(&option.id))
            .filter(|option| is_visible(&self.tree, option, selections, self.mode()))
            .map(|option| {
                let value = selections.get(&option.id);
                let display_value = option
                    .choice(value)
                    .filter(|_| option.field_type.is_select())
                    .map_or_else(|| value.to_string(), |choice| choice.label.clone());
                PersonalizationLine {
                    option_id: option.id.clone(),
                    label: option.label.clone(),
                    value: value.to_string(),
                    display_value,
                    additional_price: price_for(option, value),
                }
            })
            .collect()
    }
}
