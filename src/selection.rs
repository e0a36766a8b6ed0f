//! Selection and validation-error maps handed between the UI and the resolver.
//!
//! Both are plain value types. The caller owns them; resolver operations take
//! them by reference and return new copies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One `{optionId, value}` pair as the UI reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPair {
    pub option_id: String,
    pub value: String,
}

/// Current value per option id. Unset and empty are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionInput", into = "BTreeMap<String, String>")]
pub struct SelectionState {
    values: BTreeMap<String, String>,
}

/// Accepted wire shapes: an `id -> value` object or a list of pairs
#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionInput {
    Map(BTreeMap<String, String>),
    Pairs(Vec<SelectionPair>),
}

impl From<SelectionInput> for SelectionState {
    fn from(input: SelectionInput) -> Self {
        match input {
            SelectionInput::Map(values) => Self {
                values: values.into_iter().filter(|(_, v)| !v.is_empty()).collect(),
            },
            SelectionInput::Pairs(pairs) => Self::from_pairs(pairs),
        }
    }
}

impl From<SelectionState> for BTreeMap<String, String> {
    fn from(state: SelectionState) -> Self {
        state.values
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from UI pairs; a later pair for the same option wins
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = SelectionPair>,
    {
        let mut state = Self::new();
        for pair in pairs {
            state.set(&pair.option_id, &pair.value);
        }
        state
    }

    /// Current value, empty string when unset
    pub fn get(&self, option_id: &str) -> &str {
        self.values.get(option_id).map(String::as_str).unwrap_or("")
    }

    /// True when the option holds a non-blank value
    pub fn is_set(&self, option_id: &str) -> bool {
        !self.get(option_id).trim().is_empty()
    }

    /// Store a value. Storing an empty value removes the entry.
    pub fn set(&mut self, option_id: &str, value: &str) {
        if value.is_empty() {
            self.values.remove(option_id);
        } else {
            self.values.insert(option_id.to_string(), value.to_string());
        }
    }

    pub fn clear(&mut self, option_id: &str) {
        self.values.remove(option_id);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Back to the UI pair form, ordered by option id
    pub fn to_pairs(&self) -> Vec<SelectionPair> {
        self.values
            .iter()
            .map(|(option_id, value)| SelectionPair {
                option_id: option_id.clone(),
                value: value.clone(),
            })
            .collect()
    }
}

/// Display message per option id; at most one per option
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, option_id: &str) -> Option<&str> {
        self.errors.get(option_id).map(String::as_str)
    }

    /// Replace whatever message the option had
    pub fn set(&mut self, option_id: &str, message: impl Into<String>) {
        self.errors.insert(option_id.to_string(), message.into());
    }

    pub fn clear(&mut self, option_id: &str) {
        self.errors.remove(option_id);
    }

    /// Set or clear depending on a validation outcome
    pub fn record(&mut self, option_id: &str, outcome: Option<String>) {
        match outcome {
            Some(message) => self.set(option_id, message),
            None => self.clear(option_id),
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
