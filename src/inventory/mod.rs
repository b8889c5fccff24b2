//! Domain types for inventory actions extracted from chat messages.
//!
//! An [`InventoryAction`] is parsed from the tool-call arguments of a Groq
//! completion, lives only long enough to build the outbound reply, and is
//! never persisted or merged with prior state.

use serde::{Deserialize, Serialize};

pub mod schema;

/// Default unit token when the model does not supply one.
pub const DEFAULT_UNIT: &str = "un";

/// Default category when the model does not supply one.
pub const DEFAULT_CATEGORY: &str = "geral";

/// The kind of inventory operation requested by the user.
///
/// Unknown values are rejected at deserialization time; the caller sees them
/// as an argument-parse failure rather than a silent passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Add quantity to an existing item, or create a new one.
    Add,
    /// Remove quantity from an item.
    Subtract,
    /// Remove all quantities of an item.
    DiscardAll,
    /// Change an item's name.
    Rename,
    /// Change an item's unit of measure.
    ChangeUnit,
}

/// An item quantity, either a whole count or a decimal measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Whole-number quantity (e.g. 3 units).
    Count(i64),
    /// Fractional quantity (e.g. 1.5 kg).
    Measure(f64),
}

impl Default for Quantity {
    fn default() -> Self {
        Self::Count(1)
    }
}

/// A structured inventory action extracted from a user message.
///
/// `item_name` and `unit` are required by the tool schema; the remaining
/// fields carry the documented defaults when the model omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryAction {
    /// Requested operation, when the model recognized one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// Item name, singularized by the model unless the user quoted it.
    pub item_name: String,
    /// Quantity of the item; defaults to one.
    #[serde(default)]
    pub quantity: Quantity,
    /// Unit token (e.g. "kg", "un", "liters"); defaults to [`DEFAULT_UNIT`].
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Previous item name, populated only for renames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_item_name: Option<String>,
    /// New item name, populated only for renames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_item_name: Option<String>,
    /// Item category; defaults to [`DEFAULT_CATEGORY`].
    #[serde(default = "default_category")]
    pub category: String,
    /// Free-form item description, if given.
    #[serde(default)]
    pub description: Option<String>,
    /// Where the item is kept, if given.
    #[serde(default)]
    pub location: Option<String>,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_owned()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}
