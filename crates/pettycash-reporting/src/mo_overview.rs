//! Secondary-currency overlay for the manufacturing order cost overview.
//!
//! The overview is the nested JSON document the costing report already
//! produces. The overlay only adds keys: every monetary field keeps its
//! value and gains `<field>_<company>` and `<field>_<secondary>` siblings.

use std::str::FromStr;

use chrono::NaiveDate;
use pettycash_core::Result;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::currency::CurrencyConverter;

const RECORD_COST_FIELDS: [&str; 4] = ["mo_cost", "bom_cost", "real_cost", "unit_cost"];
const BREAKDOWN_COST_FIELDS: [&str; 3] = [
    "unit_avg_cost_component",
    "unit_avg_cost_operation",
    "unit_avg_total_cost",
];

pub const DUAL_CURRENCY_REPORT: &str = "mo_overview_dual_currency";

pub struct DualCurrencyOverlay<'a> {
    converter: &'a dyn CurrencyConverter,
    company: String,
    secondary: String,
    date: NaiveDate,
}

impl<'a> DualCurrencyOverlay<'a> {
    pub fn new(
        converter: &'a dyn CurrencyConverter,
        company: &str,
        secondary: &str,
        date: NaiveDate,
    ) -> Self {
        Self {
            converter,
            company: company.to_ascii_uppercase(),
            secondary: secondary.to_ascii_uppercase(),
            date,
        }
    }

    /// Overlays every overview in a report payload.
    pub fn apply_all(&self, docs: &mut [Value]) -> Result<()> {
        docs.iter_mut().try_for_each(|doc| self.apply(doc))
    }

    pub fn apply(&self, doc: &mut Value) -> Result<()> {
        if let Some(summary) = doc.get_mut("summary") {
            self.convert_record(summary)?;
        }

        if let Some(components) = doc.get_mut("components").and_then(Value::as_array_mut) {
            for component in components {
                if let Some(summary) = component.get_mut("summary") {
                    self.convert_record(summary)?;
                }
                let replenishments = component
                    .get_mut("replenishments")
                    .and_then(Value::as_array_mut);
                for replenishment in replenishments.into_iter().flatten() {
                    if let Some(summary) = replenishment.get_mut("summary") {
                        self.convert_record(summary)?;
                    }
                }
            }
        }

        for section in ["operations", "byproducts"] {
            let Some(section) = doc.get_mut(section) else {
                continue;
            };
            if let Some(summary) = section.get_mut("summary") {
                self.convert_record(summary)?;
            }
            if let Some(details) = section.get_mut("details").and_then(Value::as_array_mut) {
                for detail in details {
                    self.convert_record(detail)?;
                }
            }
        }

        if let Some(extras) = doc.get_mut("extras").and_then(Value::as_object_mut) {
            self.convert_extras(extras)?;
        }

        if let Some(lines) = doc.get_mut("cost_breakdown").and_then(Value::as_array_mut) {
            for line in lines.iter_mut().filter_map(Value::as_object_mut) {
                self.convert_fields(line, &BREAKDOWN_COST_FIELDS)?;
            }
        }
        Ok(())
    }

    fn convert_record(&self, record: &mut Value) -> Result<()> {
        let Some(record) = record.as_object_mut() else {
            return Ok(());
        };
        self.convert_fields(record, &RECORD_COST_FIELDS)?;
        record.insert(
            format!("currency_{}", self.company.to_ascii_lowercase()),
            Value::String(self.company.clone()),
        );
        record.insert(
            format!("currency_{}", self.secondary.to_ascii_lowercase()),
            Value::String(self.secondary.clone()),
        );
        Ok(())
    }

    fn convert_fields(&self, record: &mut Map<String, Value>, fields: &[&str]) -> Result<()> {
        for field in fields {
            let Some(amount) = record.get(*field).and_then(truthy_amount) else {
                continue;
            };
            self.write_pair(record, field, amount)?;
        }
        Ok(())
    }

    /// Numeric keys mentioning "cost", zero included.
    fn convert_extras(&self, extras: &mut Map<String, Value>) -> Result<()> {
        let costs: Vec<(String, Decimal)> = extras
            .iter()
            .filter(|(key, _)| key.to_ascii_lowercase().contains("cost"))
            .filter_map(|(key, value)| value.as_number().and_then(number_to_decimal).map(|amount| (key.clone(), amount)))
            .collect();
        for (key, amount) in costs {
            self.write_pair(extras, &key, amount)?;
        }
        Ok(())
    }

    fn write_pair(&self, record: &mut Map<String, Value>, field: &str, amount: Decimal) -> Result<()> {
        let converted = self
            .converter
            .convert(amount, &self.company, &self.secondary, self.date)?
            .round_dp(2);
        let original = record.get(field).cloned().unwrap_or(Value::Null);
        record.insert(
            format!("{field}_{}", self.company.to_ascii_lowercase()),
            original,
        );
        record.insert(
            format!("{field}_{}", self.secondary.to_ascii_lowercase()),
            decimal_to_value(converted),
        );
        Ok(())
    }
}

fn truthy_amount(value: &Value) -> Option<Decimal> {
    let amount = value.as_number().and_then(number_to_decimal)?;
    if amount.is_zero() {
        return None;
    }
    Some(amount)
}

fn number_to_decimal(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    let parsed = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok();
    if parsed.is_none() {
        debug!(%text, "cost value outside decimal range left unconverted");
    }
    parsed
}

fn decimal_to_value(amount: Decimal) -> Value {
    amount
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// What the "open dual currency report" button hands to the report engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportAction {
    pub report_name: String,
    pub report_type: String,
    pub data: Map<String, Value>,
    pub active_ids: Vec<u64>,
}

pub fn dual_currency_report_action(order_ids: &[u64], company: &str, secondary: &str) -> ReportAction {
    let mut data = Map::new();
    for code in [secondary, company] {
        data.insert(format!("show_{}", code.to_ascii_lowercase()), Value::Bool(true));
    }
    ReportAction {
        report_name: DUAL_CURRENCY_REPORT.to_string(),
        report_type: "html".to_string(),
        data,
        active_ids: order_ids.to_vec(),
    }
}
