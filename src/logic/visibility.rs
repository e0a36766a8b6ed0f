//! Visibility of conditional personalization fields.
//!
//! A root option is always visible. A child option is visible when its
//! parent exists in the tree, the parent currently holds a non-blank value,
//! and that value is one of the child's `show_when_parent_value` entries
//! (trimmed, exact, case-sensitive).
//!
//! Under [`VisibilityMode::DirectParent`] the parent's own visibility is not
//! consulted. A stale value on a hidden parent can therefore still reveal its
//! children. [`VisibilityMode::AncestorChain`] closes that gap.

use std::collections::BTreeMap;

use crate::logic::tree::OptionTree;
use crate::option::PersonalizationOption;
use crate::selection::SelectionState;
use crate::types::VisibilityMode;

/// Whether `option` is shown for the current selections
pub fn is_visible(
    tree: &OptionTree,
    option: &PersonalizationOption,
    selections: &SelectionState,
    mode: VisibilityMode,
) -> bool {
    if !condition_met(tree, option, selections) {
        return false;
    }
    match mode {
        VisibilityMode::DirectParent => true,
        VisibilityMode::AncestorChain => tree
            .ancestors(option)
            .into_iter()
            .all(|ancestor| condition_met(tree, ancestor, selections)),
    }
}

/// The option's own rule against its direct parent's raw value
fn condition_met(tree: &OptionTree, option: &PersonalizationOption, selections: &SelectionState) -> bool {
    let Some(parent_id) = option.parent_option_id.as_deref() else {
        return true;
    };
    if !tree.contains(parent_id) {
        return false;
    }
    if !selections.is_set(parent_id) {
        return false;
    }
    let parent_value = selections.get(parent_id).trim();
    option.visibility_values().contains(&parent_value)
}

/// Visibility of every option in the tree
pub fn visibility_map(
    tree: &OptionTree,
    selections: &SelectionState,
    mode: VisibilityMode,
) -> BTreeMap<String, bool> {
    tree.iter()
        .map(|option| (option.id.clone(), is_visible(tree, option, selections, mode)))
        .collect()
}
