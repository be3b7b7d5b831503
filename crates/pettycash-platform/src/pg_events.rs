use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pettycash_core::{DomainEvent, DomainEventKind, EventEnvelope, EventStore};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::error;
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pettycash_audit_events (
    sequence BIGSERIAL PRIMARY KEY,
    stream_id UUID NOT NULL,
    event_id UUID NOT NULL UNIQUE,
    kind TEXT NOT NULL,
    actor TEXT NOT NULL,
    body TEXT NOT NULL,
    payload JSONB NOT NULL DEFAULT 'null'::jsonb,
    occurred_at TIMESTAMPTZ NOT NULL,
    stored_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS pettycash_audit_events_stream_idx
    ON pettycash_audit_events (stream_id, sequence);
"#;

/// Audit trail in Postgres, one row per event.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context("failed to create audit tables")?;
        Ok(())
    }
}

fn kind_name(kind: DomainEventKind) -> Result<String> {
    match serde_json::to_value(kind)? {
        Value::String(name) => Ok(name),
        other => anyhow::bail!("unexpected event kind encoding: {other}"),
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn append(&self, stream_id: Uuid, event: DomainEvent) -> Result<EventEnvelope> {
        let row = sqlx::query(
            r#"
            INSERT INTO pettycash_audit_events (
                stream_id, event_id, kind, actor, body, payload, occurred_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING sequence, stored_at
            "#,
        )
        .bind(stream_id)
        .bind(event.id)
        .bind(kind_name(event.kind)?)
        .bind(&event.actor)
        .bind(&event.body)
        .bind(&event.payload)
        .bind(event.occurred_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            error!(%stream_id, "failed to persist audit event: {err}");
            err
        })?;

        Ok(EventEnvelope {
            sequence: row.try_get("sequence")?,
            stream_id,
            event,
            stored_at: row.try_get("stored_at")?,
        })
    }

    async fn stream(&self, stream_id: Uuid) -> Result<Vec<EventEnvelope>> {
        let rows = sqlx::query(
            r#"
            SELECT sequence, stream_id, event_id, kind, actor, body, payload, occurred_at, stored_at
            FROM pettycash_audit_events
            WHERE stream_id = $1
            ORDER BY sequence
            "#,
        )
        .bind(stream_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(envelope_from_row).collect()
    }

    async fn streams(&self, stream_ids: &[Uuid]) -> Result<Vec<EventEnvelope>> {
        let rows = sqlx::query(
            r#"
            SELECT sequence, stream_id, event_id, kind, actor, body, payload, occurred_at, stored_at
            FROM pettycash_audit_events
            WHERE stream_id = ANY($1)
            ORDER BY sequence
            "#,
        )
        .bind(stream_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(envelope_from_row).collect()
    }
}

fn envelope_from_row(row: &PgRow) -> Result<EventEnvelope> {
    let stream_id: Uuid = row.try_get("stream_id")?;
    let kind: String = row.try_get("kind")?;
    let kind: DomainEventKind =
        serde_json::from_value(Value::String(kind)).context("unknown audit event kind")?;

    Ok(EventEnvelope {
        sequence: row.try_get("sequence")?,
        stream_id,
        event: DomainEvent {
            id: row.try_get("event_id")?,
            aggregate_id: stream_id,
            kind,
            actor: row.try_get("actor")?,
            body: row.try_get("body")?,
            occurred_at: row.try_get::<DateTime<Utc>, _>("occurred_at")?,
            payload: row.try_get("payload")?,
        },
        stored_at: row.try_get("stored_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stored_as_snake_case_names() {
        assert_eq!(
            kind_name(DomainEventKind::CashIssued).unwrap(),
            "cash_issued"
        );
        assert_eq!(
            kind_name(DomainEventKind::ReimbursementCashReceived).unwrap(),
            "reimbursement_cash_received"
        );
    }
}
