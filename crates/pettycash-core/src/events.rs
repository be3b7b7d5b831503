use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainEventKind {
    FloatSubmitted,
    FloatApproved,
    FloatRejected,
    DenominationInitialized,
    RequestCreated,
    RequestSubmitted,
    RequestApproved,
    RequestRejected,
    RequestCancelled,
    RequestReset,
    CashIssued,
    CashReceiptConfirmed,
    RequestCompleted,
    BillAdded,
    BillsSubmitted,
    BillsApproved,
    BillsRejected,
    ReimbursementSubmitted,
    ReimbursementApproved,
    ReimbursementRejected,
    ReimbursementReset,
    ReimbursementCashReceived,
    ReimbursementCompleted,
    CustomizationCreated,
    CustomizationSubmitted,
    CustomizationApproved,
    CustomizationRejected,
    CustomizationCancelled,
    CustomizationReset,
    FloatCustomized,
    ConfigurationChanged,
}

/// An audit entry posted against one record. `body` is the human-readable
/// message (HTML for denomination tables); `payload` carries structured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: Uuid,
    pub aggregate_id: Uuid,
    pub kind: DomainEventKind,
    pub actor: String,
    pub body: String,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl DomainEvent {
    pub fn new(
        aggregate_id: Uuid,
        kind: DomainEventKind,
        actor: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            aggregate_id,
            kind,
            actor: actor.into(),
            body: body.into(),
            occurred_at: Utc::now(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
