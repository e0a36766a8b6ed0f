//! Logic modules - pure resolver functions over a product's option tree.
//!
//! No I/O lives here; everything is a function of the option tree and the
//! caller's current selections.
//!
//! # Modules
//!
//! - `tree` - Roots and ordered children from the flat option list
//! - `visibility` - Conditional field visibility
//! - `validation` - Required / length / pattern checks
//! - `pricing` - Per-option surcharges and totals
//! - `resolver` - Change reducer, full resolution, order lines

pub mod pricing;
pub mod resolver;
pub mod tree;
pub mod validation;
pub mod visibility;
