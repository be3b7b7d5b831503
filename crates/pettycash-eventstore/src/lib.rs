use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use pettycash_core::{DomainEvent, EventEnvelope, EventStore};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Audit trail kept in process memory; lost on restart.
#[derive(Default)]
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<Uuid, Vec<EventEnvelope>>>,
    sequence: RwLock<i64>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.streams.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, stream_id: Uuid, event: DomainEvent) -> anyhow::Result<EventEnvelope> {
        let mut sequence_guard = self.sequence.write().await;
        *sequence_guard += 1;

        let envelope = EventEnvelope {
            sequence: *sequence_guard,
            stream_id,
            event,
            stored_at: Utc::now(),
        };

        let mut streams = self.streams.write().await;
        streams.entry(stream_id).or_default().push(envelope.clone());
        debug!(sequence = envelope.sequence, %stream_id, "audit event stored");

        Ok(envelope)
    }

    async fn stream(&self, stream_id: Uuid) -> anyhow::Result<Vec<EventEnvelope>> {
        let streams = self.streams.read().await;
        Ok(streams.get(&stream_id).cloned().unwrap_or_default())
    }

    async fn streams(&self, stream_ids: &[Uuid]) -> anyhow::Result<Vec<EventEnvelope>> {
        let streams = self.streams.read().await;
        let mut merged: Vec<EventEnvelope> = stream_ids
            .iter()
            .filter_map(|stream_id| streams.get(stream_id))
            .flatten()
            .cloned()
            .collect();
        merged.sort_by_key(|envelope| envelope.sequence);
        merged.dedup_by_key(|envelope| envelope.sequence);
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pettycash_core::DomainEventKind;

    #[tokio::test]
    async fn sequences_are_global_and_streams_separate() {
        let store = InMemoryEventStore::new();
        let float_id = Uuid::new_v4();
        let request_id = Uuid::new_v4();

        store
            .append(
                float_id,
                DomainEvent::new(float_id, DomainEventKind::FloatSubmitted, "nimal", "Float submitted"),
            )
            .await
            .unwrap();
        let second = store
            .append(
                request_id,
                DomainEvent::new(request_id, DomainEventKind::RequestCreated, "kasun", "Request created"),
            )
            .await
            .unwrap();

        assert_eq!(second.sequence, 2);
        assert_eq!(store.stream(float_id).await.unwrap().len(), 1);
        assert_eq!(store.len().await, 2);
        assert!(store.stream(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn merged_streams_keep_append_order() {
        let store = InMemoryEventStore::new();
        let float_id = Uuid::new_v4();
        let request_id = Uuid::new_v4();
        let other_float = Uuid::new_v4();

        for (stream_id, kind) in [
            (float_id, DomainEventKind::FloatSubmitted),
            (request_id, DomainEventKind::RequestSubmitted),
            (other_float, DomainEventKind::FloatSubmitted),
            (float_id, DomainEventKind::FloatApproved),
        ] {
            store
                .append(stream_id, DomainEvent::new(stream_id, kind, "nimal", "moved"))
                .await
                .unwrap();
        }

        let merged = store.streams(&[request_id, float_id, float_id]).await.unwrap();
        let sequences: Vec<i64> = merged.iter().map(|envelope| envelope.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 4]);
        assert_eq!(merged[2].event.kind, DomainEventKind::FloatApproved);
    }
}
