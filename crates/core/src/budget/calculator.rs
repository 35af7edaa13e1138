//! Line-item cost calculator.
//!
//! ```text
//! quantity_needed      = quantity_real × (1 + waste_pct / 100)
//! effective_unit_price = unit_cost × (1 + fee_pct / 100)
//! item_total           = quantity_needed × effective_unit_price
//! ```
//!
//! No rounding is applied; formatting belongs to whoever displays the value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dovita_shared::types::Percentage;

/// Derived values for one line item. Never persisted, only its inputs are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCost {
    /// Real quantity plus waste.
    pub quantity_needed: Decimal,
    /// Unit cost plus fee.
    pub effective_unit_price: Decimal,
    /// Needed quantity times effective unit price.
    pub item_total: Decimal,
}

impl ItemCost {
    /// All-zero cost.
    pub const ZERO: Self = Self {
        quantity_needed: Decimal::ZERO,
        effective_unit_price: Decimal::ZERO,
        item_total: Decimal::ZERO,
    };
}

/// Negative inputs count as zero.
fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Computes the derived values of a line item.
///
/// Total over its inputs: negative values are clamped to zero and products
/// saturate instead of overflowing.
#[must_use]
pub fn compute(
    quantity_real: Decimal,
    waste_pct: Decimal,
    unit_cost: Decimal,
    fee_pct: Decimal,
) -> ItemCost {
    let quantity_needed = non_negative(quantity_real)
        .saturating_mul(Percentage::new(non_negative(waste_pct)).growth_factor());
    let effective_unit_price = non_negative(unit_cost)
        .saturating_mul(Percentage::new(non_negative(fee_pct)).growth_factor());

    ItemCost {
        quantity_needed,
        effective_unit_price,
        item_total: quantity_needed.saturating_mul(effective_unit_price),
    }
}
