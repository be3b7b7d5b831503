use pettycash_core::money::ensure_matches;
use pettycash_core::{
    Breakdown, DomainEvent, DomainEventKind, Float, FloatAction, FloatStatus, NewFloat,
    PettyCashError, Result, transition,
};
use pettycash_denomination::render::initial_setup_message;
use pettycash_denomination::{Allocation, DenominationTally, suggest_initial};
use pettycash_finance::FloatBalances;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::FloatDesk;

pub(crate) fn ensure_approved(float: &Float) -> Result<()> {
    if float.status != FloatStatus::Approved {
        return Err(PettyCashError::invalid(format!(
            "Float \"{}\" is not approved (status: {}).",
            float.name, float.status
        )));
    }
    Ok(())
}

impl FloatDesk {
    pub async fn create_float(&self, new_float: NewFloat, actor: &str) -> Result<Float> {
        let float = new_float.into_float()?;
        self.books
            .write()
            .await
            .floats
            .insert(float.id, float.clone());
        info!(float_id = %float.id, %actor, "float created");
        Ok(float)
    }

    pub async fn float(&self, float_id: Uuid) -> Result<Float> {
        self.books.read().await.float(float_id).cloned()
    }

    pub async fn floats(&self) -> Vec<Float> {
        let books = self.books.read().await;
        let mut floats: Vec<Float> = books.floats.values().cloned().collect();
        floats.sort_by(|a, b| a.name.cmp(&b.name));
        floats
    }

    pub async fn float_balances(&self, float_id: Uuid) -> Result<FloatBalances> {
        let books = self.books.read().await;
        let float = books.float(float_id)?;
        Ok(books.balances(float))
    }

    pub async fn submit_float(&self, float_id: Uuid, actor: &str) -> Result<Float> {
        self.move_float(float_id, FloatAction::Submit, actor).await
    }

    pub async fn approve_float(&self, float_id: Uuid, actor: &str) -> Result<Float> {
        self.move_float(float_id, FloatAction::Approve, actor).await
    }

    pub async fn reject_float(&self, float_id: Uuid, actor: &str) -> Result<Float> {
        self.move_float(float_id, FloatAction::Reject, actor).await
    }

    async fn move_float(&self, float_id: Uuid, action: FloatAction, actor: &str) -> Result<Float> {
        let mut books = self.books.write().await;
        let float = books.float_mut(float_id)?;
        float.status = transition("float", float.status, action)?;
        let float = float.clone();

        let (kind, body) = match action {
            FloatAction::Submit => (DomainEventKind::FloatSubmitted, "Float submitted for approval"),
            FloatAction::Approve => (DomainEventKind::FloatApproved, "Float approved"),
            FloatAction::Reject => (DomainEventKind::FloatRejected, "Float rejected"),
        };
        self.record(DomainEvent::new(float_id, kind, actor, body))
            .await?;
        info!(%float_id, status = %float.status, %actor, "float moved");
        Ok(float)
    }

    /// Greedy opening breakdown for the float's initial amount.
    pub async fn suggest_initial_denomination(&self, float_id: Uuid) -> Result<Allocation> {
        let books = self.books.read().await;
        Ok(suggest_initial(books.float(float_id)?.initial_amount))
    }

    /// Records the notes and coins a float starts with. Allowed once.
    pub async fn set_initial_denomination(
        &self,
        float_id: Uuid,
        breakdown: Breakdown,
        actor: &str,
    ) -> Result<DenominationTally> {
        let mut books = self.books.write().await;
        let float = books.float(float_id)?;
        if books.tallies.contains_key(&float_id) {
            return Err(PettyCashError::Duplicate(format!(
                "Float \"{}\" already has its initial denomination set.",
                float.name
            )));
        }
        ensure_matches("Denomination total", float.initial_amount, breakdown.total())?;

        let tally = DenominationTally::new(float_id, breakdown);
        books.tallies.insert(float_id, tally.clone());

        self.record(
            DomainEvent::new(
                float_id,
                DomainEventKind::DenominationInitialized,
                actor,
                initial_setup_message(&breakdown),
            )
            .with_payload(json!({ "counts": breakdown })),
        )
        .await?;
        info!(%float_id, total = %tally.total(), "initial denomination set");
        Ok(tally)
    }

    pub async fn denomination(&self, float_id: Uuid) -> Result<DenominationTally> {
        self.books.read().await.tally(float_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{admin_float, approved_float};
    use pettycash_core::Tier;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn float_walks_submit_then_approve() {
        let desk = FloatDesk::in_memory();
        let float = desk.create_float(admin_float(dec!(15000)), "nimal").await.unwrap();
        assert_eq!(float.status, FloatStatus::Draft);

        desk.submit_float(float.id, "nimal").await.unwrap();
        let float = desk.approve_float(float.id, "director").await.unwrap();
        assert_eq!(float.status, FloatStatus::Approved);
        assert_eq!(desk.audit_trail(float.id).await.unwrap().len(), 2);

        let err = desk.reject_float(float.id, "director").await.unwrap_err();
        assert_eq!(err.to_string(), "cannot reject a float in approved state");
    }

    #[tokio::test]
    async fn initial_denomination_must_match_amount() {
        let desk = FloatDesk::in_memory();
        let float = desk.create_float(admin_float(dec!(15000)), "nimal").await.unwrap();

        let short = Breakdown::new().with(Tier::Note5000, 2);
        assert!(matches!(
            desk.set_initial_denomination(float.id, short, "nimal").await,
            Err(PettyCashError::AmountMismatch { .. })
        ));
        assert!(desk.denomination(float.id).await.is_err());

        let suggestion = desk.suggest_initial_denomination(float.id).await.unwrap();
        assert!(suggestion.is_exact());
        desk.set_initial_denomination(float.id, suggestion.breakdown, "nimal")
            .await
            .unwrap();

        let trail = desk.audit_trail(float.id).await.unwrap();
        assert!(trail[0].event.body.contains("Initial Denomination Setup"));
    }

    #[tokio::test]
    async fn initial_denomination_is_set_once() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;

        let again = Breakdown::new().with(Tier::Note5000, 3);
        assert!(matches!(
            desk.set_initial_denomination(float.id, again, "nimal").await,
            Err(PettyCashError::Duplicate(_))
        ));
    }
}
