//! Greedy largest-first note/coin allocation.
//!
//! Every tier takes as many units as fit into the remaining amount, bounded
//! by a per-tier cap. Whatever cannot be covered is returned as the
//! remainder, integral or fractional alike.

use pettycash_core::{Breakdown, PettyCashError, Result, Tier};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Upper bound on units per tier when proposing an opening float.
pub fn initial_cap(tier: Tier) -> u32 {
    match tier {
        Tier::Note5000 => 10,
        Tier::Note1000 => 20,
        Tier::Note500 => 15,
        Tier::Note100 => 30,
        Tier::Note50 => 10,
        Tier::Note20 => 25,
        Tier::Coin10 | Tier::Coin5 | Tier::Coin2 => 50,
        Tier::Coin1 => 100,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub breakdown: Breakdown,
    pub remainder: Decimal,
}

impl Allocation {
    pub fn is_exact(&self) -> bool {
        self.remainder.is_zero()
    }
}

pub fn greedy(amount: Decimal, cap: impl Fn(Tier) -> u32) -> Allocation {
    let mut remaining = amount;
    let mut breakdown = Breakdown::new();

    for tier in Tier::ALL {
        if remaining <= Decimal::ZERO {
            break;
        }
        let face = Decimal::from(tier.face_value());
        let fits = (remaining / face).floor().to_u32().unwrap_or(u32::MAX);
        let count = fits.min(cap(tier));
        breakdown.set(tier, count);
        remaining -= face * Decimal::from(count);
    }

    Allocation {
        breakdown,
        remainder: remaining,
    }
}

/// Opening breakdown proposal for a new float. The remainder is reported,
/// not raised: the custodian adjusts counts before saving.
pub fn suggest_initial(amount: Decimal) -> Allocation {
    greedy(amount, initial_cap)
}

/// Picks notes for a disbursement out of what the float actually holds.
pub fn allocate_from_stock(amount: Decimal, stock: &Breakdown) -> Result<Breakdown> {
    if amount <= Decimal::ZERO {
        return Err(PettyCashError::invalid(
            "No amount to calculate denominations for.",
        ));
    }

    let allocation = greedy(amount, |tier| stock.get(tier));
    if allocation.is_exact() {
        Ok(allocation.breakdown)
    } else {
        Err(PettyCashError::UnrepresentableAmount {
            remaining: allocation.remainder,
        })
    }
}
