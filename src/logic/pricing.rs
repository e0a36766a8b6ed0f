//! Surcharge computation for personalization selections.
//!
//! All amounts are integer cents in a single currency.
//!
//! | Field            | Pricing type   | Contribution |
//! |------------------|----------------|--------------|
//! | select           | any            | chosen entry's `additional_price`, 0 if unset/unknown |
//! | other            | `Flat`         | `additional_price` when the value is non-blank |
//! | other            | anything else  | 0 |
//!
//! Totals saturate at `i64::MAX` / `i64::MIN` instead of overflowing.

use std::collections::BTreeMap;

use crate::logic::tree::OptionTree;
use crate::logic::visibility::is_visible;
use crate::option::PersonalizationOption;
use crate::selection::SelectionState;
use crate::types::{PricingType, VisibilityMode};

/// Surcharge contributed by `value` on `option`
pub fn price_for(option: &PersonalizationOption, value: &str) -> i64 {
    if option.field_type.is_select() {
        if value.is_empty() {
            return 0;
        }
        return option.choice(value).map_or(0, |choice| choice.additional_price);
    }

    match option.pricing_type {
        PricingType::Flat if !value.trim().is_empty() => option.additional_price,
        PricingType::Unsupported => {
            tracing::debug!(option = %option.id, "pricing type not supported, contributing zero");
            0
        }
        _ => 0,
    }
}

/// Surcharge per visible option
pub fn price_map(
    tree: &OptionTree,
    selections: &SelectionState,
    mode: VisibilityMode,
) -> BTreeMap<String, i64> {
    tree.iter()
        .filter(|option| is_visible(tree, option, selections, mode))
        .map(|option| (option.id.clone(), price_for(option, selections.get(&option.id))))
        .collect()
}

/// Sum of surcharges over visible options. Stale values on hidden options
/// are ignored.
pub fn total_price(tree: &OptionTree, selections: &SelectionState, mode: VisibilityMode) -> i64 {
    sum_prices(price_map(tree, selections, mode).values())
}

/// Saturating sum of surcharges
pub fn sum_prices<'a>(prices: impl IntoIterator<Item = &'a i64>) -> i64 {
    prices.into_iter().fold(0i64, |total, price| total.saturating_add(*price))
}
