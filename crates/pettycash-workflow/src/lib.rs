//! The float desk: every petty cash record and the operations that move
//! them through their approval workflows.
//!
//! Each operation takes the books' write lock, checks every guard, and only
//! then mutates, so a failed call leaves nothing behind. Audit events are
//! appended to the [`EventStore`] once the books have changed.

mod bills;
mod books;
mod customizations;
mod floats;
mod queries;
mod reimbursements;
mod requests;
mod settings;

#[cfg(test)]
mod fixtures;

use std::sync::Arc;

use pettycash_core::{DomainEvent, EventEnvelope, EventStore, Result};
use pettycash_eventstore::InMemoryEventStore;
use tokio::sync::RwLock;
use tracing::error;
use uuid::Uuid;

use crate::books::Books;

pub use pettycash_denomination::{Allocation, DenominationTally};
pub use pettycash_finance::FloatBalances;
pub use queries::{DepartmentSummary, FloatOverview, FloatStatement};
pub use requests::CashIssueInput;
pub use settings::SETTINGS_STREAM;

pub struct FloatDesk {
    books: RwLock<Books>,
    events: Arc<dyn EventStore>,
}

impl FloatDesk {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self {
            books: RwLock::new(Books::default()),
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEventStore::new()))
    }

    /// Audit messages posted against one record, oldest first.
    pub async fn audit_trail(&self, record_id: Uuid) -> Result<Vec<EventEnvelope>> {
        Ok(self.events.stream(record_id).await?)
    }

    /// The books are already updated when this runs; a failed append leaves
    /// them changed and the trail one entry short.
    async fn record(&self, event: DomainEvent) -> Result<()> {
        let stream_id = event.aggregate_id;
        let kind = event.kind;
        let actor = event.actor.clone();
        if let Err(err) = self.events.append(stream_id, event).await {
            error!(%stream_id, ?kind, %actor, "audit event not stored: {err:#}");
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::admin_float;
    use async_trait::async_trait;
    use pettycash_core::{FloatStatus, PettyCashError};
    use rust_decimal_macros::dec;

    struct UnreachableStore;

    #[async_trait]
    impl EventStore for UnreachableStore {
        async fn append(&self, _: Uuid, _: DomainEvent) -> anyhow::Result<EventEnvelope> {
            anyhow::bail!("connection refused")
        }

        async fn stream(&self, _: Uuid) -> anyhow::Result<Vec<EventEnvelope>> {
            anyhow::bail!("connection refused")
        }

        async fn streams(&self, _: &[Uuid]) -> anyhow::Result<Vec<EventEnvelope>> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn store_failure_surfaces_after_the_change() {
        let desk = FloatDesk::new(Arc::new(UnreachableStore));
        let float = desk
            .create_float(admin_float(dec!(15000)), "nimal")
            .await
            .unwrap();

        let err = desk.submit_float(float.id, "nimal").await.unwrap_err();
        assert!(matches!(err, PettyCashError::Storage(_)));
        assert_eq!(
            desk.float(float.id).await.unwrap().status,
            FloatStatus::Requested
        );
        assert!(matches!(
            desk.audit_trail(float.id).await,
            Err(PettyCashError::Storage(_))
        ));
    }
}
