use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use pettycash_core::{PettyCashError, Result};
use rust_decimal::Decimal;

pub trait CurrencyConverter: Send + Sync {
    fn convert(&self, amount: Decimal, from: &str, to: &str, date: NaiveDate) -> Result<Decimal>;
}

/// Dated exchange rates, each expressed as units of a currency per one
/// unit of the company currency. The company currency is always 1.
#[derive(Debug, Clone)]
pub struct RateTable {
    company_currency: String,
    rates: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl RateTable {
    pub fn new(company_currency: &str) -> Self {
        Self {
            company_currency: company_currency.to_ascii_uppercase(),
            rates: HashMap::new(),
        }
    }

    pub fn company_currency(&self) -> &str {
        &self.company_currency
    }

    pub fn set_rate(&mut self, currency: &str, date: NaiveDate, rate: Decimal) -> Result<()> {
        if rate <= Decimal::ZERO {
            return Err(PettyCashError::invalid(format!(
                "Exchange rate for {currency} must be positive."
            )));
        }
        self.rates
            .entry(currency.to_ascii_uppercase())
            .or_default()
            .insert(date, rate);
        Ok(())
    }

    pub fn with_rate(mut self, currency: &str, date: NaiveDate, rate: Decimal) -> Result<Self> {
        self.set_rate(currency, date, rate)?;
        Ok(self)
    }

    /// Latest rate on or before `date`.
    pub fn rate_on(&self, currency: &str, date: NaiveDate) -> Result<Decimal> {
        let currency = currency.to_ascii_uppercase();
        if currency == self.company_currency {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&currency)
            .and_then(|history| history.range(..=date).next_back())
            .map(|(_, rate)| *rate)
            .ok_or(PettyCashError::MissingRate { currency, date })
    }
}

impl CurrencyConverter for RateTable {
    fn convert(&self, amount: Decimal, from: &str, to: &str, date: NaiveDate) -> Result<Decimal> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(amount);
        }
        let from_rate = self.rate_on(from, date)?;
        let to_rate = self.rate_on(to, date)?;
        Ok(amount / from_rate * to_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn table() -> RateTable {
        RateTable::new("LKR")
            .with_rate("USD", date(1), dec!(0.0033))
            .unwrap()
            .with_rate("usd", date(10), dec!(0.0034))
            .unwrap()
    }

    #[test]
    fn uses_latest_rate_not_after_date() {
        let rates = table();
        assert_eq!(rates.rate_on("USD", date(5)).unwrap(), dec!(0.0033));
        assert_eq!(rates.rate_on("USD", date(10)).unwrap(), dec!(0.0034));
        assert_eq!(rates.rate_on("USD", date(28)).unwrap(), dec!(0.0034));
    }

    #[test]
    fn missing_history_is_an_error() {
        let err = table().rate_on("EUR", date(5)).unwrap_err();
        assert!(matches!(err, PettyCashError::MissingRate { ref currency, .. } if currency == "EUR"));

        let too_early = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(table().rate_on("USD", too_early).is_err());
    }

    #[test]
    fn converts_both_ways_through_company_currency() {
        let rates = table();
        assert_eq!(rates.convert(dec!(10000), "LKR", "USD", date(5)).unwrap(), dec!(33));
        assert_eq!(rates.convert(dec!(33), "USD", "LKR", date(5)).unwrap(), dec!(10000));
        assert_eq!(rates.convert(dec!(5), "USD", "USD", date(5)).unwrap(), dec!(5));
    }

    #[test]
    fn rates_must_be_positive() {
        assert!(RateTable::new("LKR").set_rate("USD", date(1), Decimal::ZERO).is_err());
    }
}
