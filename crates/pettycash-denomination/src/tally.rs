use chrono::{DateTime, Utc};
use pettycash_core::{Breakdown, PettyCashError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Physical notes and coins held for one float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenominationTally {
    pub float_id: Uuid,
    pub counts: Breakdown,
    pub last_updated: DateTime<Utc>,
}

impl DenominationTally {
    pub fn new(float_id: Uuid, counts: Breakdown) -> Self {
        Self {
            float_id,
            counts,
            last_updated: Utc::now(),
        }
    }

    pub fn total(&self) -> Decimal {
        self.counts.total()
    }

    /// Whether `taken` can leave the tally without any tier going negative.
    pub fn ensure_available(&self, taken: &Breakdown) -> Result<()> {
        match taken.first_shortfall(&self.counts) {
            Some((tier, requested, available)) => Err(PettyCashError::InsufficientDenomination {
                tier,
                requested,
                available,
            }),
            None => Ok(()),
        }
    }

    pub fn deduct(&mut self, taken: &Breakdown) -> Result<()> {
        self.ensure_available(taken)?;
        if let Some(remaining) = self.counts.checked_sub(taken) {
            self.counts = remaining;
            self.last_updated = Utc::now();
        }
        Ok(())
    }

    pub fn restock(&mut self, added: &Breakdown) {
        self.counts = self.counts.saturating_add(added);
        self.last_updated = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pettycash_core::Tier;
    use rust_decimal_macros::dec;

    fn tally() -> DenominationTally {
        DenominationTally::new(
            Uuid::new_v4(),
            Breakdown::new()
                .with(Tier::Note5000, 2)
                .with(Tier::Note1000, 5)
                .with(Tier::Note100, 0),
        )
    }

    #[test]
    fn deduct_subtracts_component_wise() {
        let mut tally = tally();
        tally
            .deduct(&Breakdown::new().with(Tier::Note1000, 2))
            .unwrap();
        assert_eq!(tally.counts.get(Tier::Note1000), 3);
        assert_eq!(tally.counts.get(Tier::Note5000), 2);
        assert_eq!(tally.total(), dec!(13000));
    }

    #[test]
    fn deduct_beyond_stock_leaves_tally_untouched() {
        let mut tally = tally();
        let before = tally.counts;
        let err = tally
            .deduct(&Breakdown::new().with(Tier::Note1000, 1).with(Tier::Note100, 3))
            .unwrap_err();

        assert!(matches!(
            err,
            PettyCashError::InsufficientDenomination {
                tier: Tier::Note100,
                requested: 3,
                available: 0
            }
        ));
        assert_eq!(tally.counts, before);
    }

    #[test]
    fn restock_adds_counts() {
        let mut tally = tally();
        tally.restock(&Breakdown::new().with(Tier::Note100, 4));
        assert_eq!(tally.counts.get(Tier::Note100), 4);
        assert_eq!(tally.total(), dec!(15400));
    }
}
