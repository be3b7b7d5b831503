use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const TIER_COUNT: usize = 10;

/// A physical note or coin face value, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Tier {
    Note5000,
    Note1000,
    Note500,
    Note100,
    Note50,
    Note20,
    Coin10,
    Coin5,
    Coin2,
    Coin1,
}

impl Tier {
    pub const ALL: [Tier; TIER_COUNT] = [
        Tier::Note5000,
        Tier::Note1000,
        Tier::Note500,
        Tier::Note100,
        Tier::Note50,
        Tier::Note20,
        Tier::Coin10,
        Tier::Coin5,
        Tier::Coin2,
        Tier::Coin1,
    ];

    pub fn face_value(self) -> u32 {
        match self {
            Tier::Note5000 => 5000,
            Tier::Note1000 => 1000,
            Tier::Note500 => 500,
            Tier::Note100 => 100,
            Tier::Note50 => 50,
            Tier::Note20 => 20,
            Tier::Coin10 => 10,
            Tier::Coin5 => 5,
            Tier::Coin2 => 2,
            Tier::Coin1 => 1,
        }
    }

    pub fn is_coin(self) -> bool {
        matches!(self, Tier::Coin10 | Tier::Coin5 | Tier::Coin2 | Tier::Coin1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Note5000 => "Rs. 5,000",
            Tier::Note1000 => "Rs. 1,000",
            Tier::Note500 => "Rs. 500",
            Tier::Note100 => "Rs. 100",
            Tier::Note50 => "Rs. 50",
            Tier::Note20 => "Rs. 20",
            Tier::Coin10 => "Rs. 10",
            Tier::Coin5 => "Rs. 5",
            Tier::Coin2 => "Rs. 2",
            Tier::Coin1 => "Rs. 1",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_coin() { "coins" } else { "notes" };
        write!(f, "{} {}", self.label(), kind)
    }
}

impl TryFrom<u32> for Tier {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.face_value() == value)
            .ok_or_else(|| format!("{value} is not a supported denomination"))
    }
}

impl From<Tier> for u32 {
    fn from(tier: Tier) -> Self {
        tier.face_value()
    }
}

/// Note/coin counts per tier. Serialized as a `{face_value: count}` map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Tier, u32>", into = "BTreeMap<Tier, u32>")]
pub struct Breakdown {
    counts: [u32; TIER_COUNT],
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tier: Tier, count: u32) -> Self {
        self.set(tier, count);
        self
    }

    pub fn get(&self, tier: Tier) -> u32 {
        self.counts[tier.index()]
    }

    pub fn set(&mut self, tier: Tier, count: u32) {
        self.counts[tier.index()] = count;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, u32)> + '_ {
        Tier::ALL.into_iter().map(|tier| (tier, self.get(tier)))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|count| *count == 0)
    }

    pub fn total(&self) -> Decimal {
        self.iter()
            .map(|(tier, count)| Decimal::from(u64::from(tier.face_value()) * u64::from(count)))
            .sum()
    }

    /// First tier where `self` needs more than `stock` holds.
    pub fn first_shortfall(&self, stock: &Breakdown) -> Option<(Tier, u32, u32)> {
        self.iter()
            .find(|(tier, count)| *count > stock.get(*tier))
            .map(|(tier, count)| (tier, count, stock.get(tier)))
    }

    /// Component-wise subtraction; `None` when any tier would go negative.
    pub fn checked_sub(&self, other: &Breakdown) -> Option<Breakdown> {
        let mut result = *self;
        for (slot, taken) in result.counts.iter_mut().zip(other.counts) {
            *slot = slot.checked_sub(taken)?;
        }
        Some(result)
    }

    pub fn saturating_add(&self, other: &Breakdown) -> Breakdown {
        let mut result = *self;
        for (slot, added) in result.counts.iter_mut().zip(other.counts) {
            *slot = slot.saturating_add(added);
        }
        result
    }
}

impl From<BTreeMap<Tier, u32>> for Breakdown {
    fn from(map: BTreeMap<Tier, u32>) -> Self {
        let mut breakdown = Breakdown::new();
        for (tier, count) in map {
            breakdown.set(tier, count);
        }
        breakdown
    }
}

impl From<Breakdown> for BTreeMap<Tier, u32> {
    fn from(breakdown: Breakdown) -> Self {
        breakdown.iter().filter(|(_, count)| *count > 0).collect()
    }
}
