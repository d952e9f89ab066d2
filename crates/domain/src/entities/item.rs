//! Item definitions (static content).

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// An item that can sit in an inventory or be sold by a vendor.
///
/// This is a data-carrying struct with no invariants to protect beyond
/// `max_stack >= 1`, which the content loader checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Vendor buy price in gold; selling returns half.
    pub price: u64,
    pub max_stack: u32,
    /// Whether vendors stock it.
    #[serde(default)]
    pub sold_by_vendor: bool,
}

impl ItemDef {
    pub fn sell_price(&self) -> u64 {
        self.price / 2
    }
}
