use rust_decimal::Decimal;
use uuid::Uuid;

use crate::denomination::Tier;

pub type Result<T, E = PettyCashError> = std::result::Result<T, E>;

/// Every failure a desk operation can surface. All of them abort the
/// operation without touching the books.
#[derive(Debug, thiserror::Error)]
pub enum PettyCashError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("cannot {action} a {entity} in {status} state")]
    InvalidTransition {
        entity: &'static str,
        action: &'static str,
        status: String,
    },

    #[error("Please fix the following:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("not enough {tier} available: requested {requested}, available {available}")]
    InsufficientDenomination {
        tier: Tier,
        requested: u32,
        available: u32,
    },

    #[error("{context} ({actual}) must equal {expected}")]
    AmountMismatch {
        context: &'static str,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("remaining Rs. {remaining} cannot be provided with the available denominations")]
    UnrepresentableAmount { remaining: Decimal },

    #[error("{0} approval is missing")]
    MissingApproval(&'static str),

    #[error("{0}")]
    Duplicate(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no {currency} rate on or before {date}")]
    MissingRate {
        currency: String,
        date: chrono::NaiveDate,
    },

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl PettyCashError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Collects validation messages so a record reports every problem at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.0.push(message.into());
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(PettyCashError::Validation(self.0))
        }
    }
}
