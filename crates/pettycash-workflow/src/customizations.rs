use chrono::Utc;
use pettycash_core::{
    Approval, CustomizationAction, CustomizationStatus, DomainEvent, DomainEventKind,
    FloatChanges, FloatCustomization, FloatTerms, NewCustomization, PettyCashError, Result,
    transition,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::FloatDesk;
use crate::books::Books;
use crate::floats::ensure_approved;

const ENTITY: &str = "float customization";

/// A float carries at most one draft or requested customization.
fn ensure_single_pending(books: &Books, float_id: Uuid, except: Option<Uuid>) -> Result<()> {
    let clash = books.customizations.values().any(|customization| {
        customization.float_id == float_id
            && customization.status.is_pending()
            && Some(customization.id) != except
    });
    if clash {
        let name = books.float(float_id)?.name.clone();
        return Err(PettyCashError::Duplicate(format!(
            "Float \"{name}\" already has a customization in progress."
        )));
    }
    Ok(())
}

impl FloatDesk {
    pub async fn create_customization(
        &self,
        new_customization: NewCustomization,
        actor: &str,
    ) -> Result<FloatCustomization> {
        let mut books = self.books.write().await;
        let float = books.float(new_customization.float_id)?;
        ensure_approved(float)?;
        ensure_single_pending(&books, float.id, None)?;

        let customization = new_customization.into_customization(float)?;
        books
            .customizations
            .insert(customization.id, customization.clone());

        self.record(DomainEvent::new(
            customization.id,
            DomainEventKind::CustomizationCreated,
            actor,
            format!("Customization requested: {}", customization.reason_for_change),
        ))
        .await?;
        Ok(customization)
    }

    pub async fn customization(&self, customization_id: Uuid) -> Result<FloatCustomization> {
        self.books
            .read()
            .await
            .customization(customization_id)
            .cloned()
    }

    pub async fn customizations(&self, float_id: Option<Uuid>) -> Vec<FloatCustomization> {
        let books = self.books.read().await;
        let mut customizations: Vec<FloatCustomization> = books
            .customizations
            .values()
            .filter(|customization| float_id.is_none_or(|id| customization.float_id == id))
            .cloned()
            .collect();
        customizations.sort_by_key(|customization| customization.request_date);
        customizations
    }

    pub async fn submit_customization(
        &self,
        customization_id: Uuid,
        actor: &str,
    ) -> Result<FloatCustomization> {
        let mut books = self.books.write().await;
        let customization = books.customization(customization_id)?;
        let next = transition(ENTITY, customization.status, CustomizationAction::Submit)?;
        customization.changes.validate()?;
        ensure_approved(books.float(customization.float_id)?)?;

        let customization = books.customization_mut(customization_id)?;
        customization.status = next;
        let customization = customization.clone();

        self.record(DomainEvent::new(
            customization_id,
            DomainEventKind::CustomizationSubmitted,
            actor,
            "Submitted for approval",
        ))
        .await?;
        Ok(customization)
    }

    /// Writes the staged changes onto the float. A second approval fails on
    /// the status table, so changes are never applied twice.
    pub async fn approve_customization(
        &self,
        customization_id: Uuid,
        actor: &str,
    ) -> Result<FloatCustomization> {
        let mut books = self.books.write().await;
        let customization = books.customization(customization_id)?;
        let next = transition(ENTITY, customization.status, CustomizationAction::Approve)?;
        let float_id = customization.float_id;
        let changes = customization.changes.clone();
        ensure_approved(books.float(float_id)?)?;

        let float = books.float_mut(float_id)?;
        let change_log = changes.apply_to(float);
        let float_name = float.name.clone();

        let customization = books.customization_mut(customization_id)?;
        customization.status = next;
        customization.approval = Some(Approval::now(actor));
        customization.change_log = change_log.clone();
        let customization = customization.clone();

        self.record(DomainEvent::new(
            customization_id,
            DomainEventKind::CustomizationApproved,
            actor,
            "Customization approved and applied",
        ))
        .await?;
        self.record(
            DomainEvent::new(
                float_id,
                DomainEventKind::FloatCustomized,
                actor,
                format!("Float customized:\n{}", change_log.join("\n")),
            )
            .with_payload(json!({ "customization_id": customization_id })),
        )
        .await?;
        info!(%customization_id, float = %float_name, changes = change_log.len(), "customization applied");
        Ok(customization)
    }

    pub async fn reject_customization(
        &self,
        customization_id: Uuid,
        reason: &str,
        actor: &str,
    ) -> Result<FloatCustomization> {
        if reason.trim().is_empty() {
            return Err(PettyCashError::invalid("Provide a rejection reason."));
        }

        let mut books = self.books.write().await;
        let customization = books.customization_mut(customization_id)?;
        customization.status = transition(ENTITY, customization.status, CustomizationAction::Reject)?;
        customization.rejection = Some(Approval::now(actor));
        customization.rejection_reason = Some(reason.trim().to_string());
        let customization = customization.clone();

        self.record(DomainEvent::new(
            customization_id,
            DomainEventKind::CustomizationRejected,
            actor,
            format!("Rejected: {}", reason.trim()),
        ))
        .await?;
        Ok(customization)
    }

    pub async fn cancel_customization(
        &self,
        customization_id: Uuid,
        actor: &str,
    ) -> Result<FloatCustomization> {
        let mut books = self.books.write().await;
        let customization = books.customization_mut(customization_id)?;
        customization.status = transition(ENTITY, customization.status, CustomizationAction::Cancel)?;
        let customization = customization.clone();

        self.record(DomainEvent::new(
            customization_id,
            DomainEventKind::CustomizationCancelled,
            actor,
            "Cancelled",
        ))
        .await?;
        Ok(customization)
    }

    /// Reopens a rejected customization as a draft.
    pub async fn reset_customization(
        &self,
        customization_id: Uuid,
        actor: &str,
    ) -> Result<FloatCustomization> {
        let mut books = self.books.write().await;
        let customization = books.customization(customization_id)?;
        let next = transition(
            ENTITY,
            customization.status,
            CustomizationAction::ResetToDraft,
        )?;
        ensure_single_pending(&books, customization.float_id, Some(customization_id))?;

        let customization = books.customization_mut(customization_id)?;
        customization.status = next;
        customization.approval = None;
        customization.rejection = None;
        customization.rejection_reason = None;
        let customization = customization.clone();

        self.record(DomainEvent::new(
            customization_id,
            DomainEventKind::CustomizationReset,
            actor,
            "Reset to draft",
        ))
        .await?;
        Ok(customization)
    }

    /// Clears the staged modifications of a draft.
    pub async fn clear_customization_changes(
        &self,
        customization_id: Uuid,
        actor: &str,
    ) -> Result<FloatCustomization> {
        let mut books = self.books.write().await;
        let customization = books.customization_mut(customization_id)?;
        if customization.status != CustomizationStatus::Draft {
            return Err(PettyCashError::InvalidTransition {
                entity: ENTITY,
                action: "clear",
                status: customization.status.to_string(),
            });
        }
        customization.changes = FloatChanges::default();
        let customization = customization.clone();

        self.record(DomainEvent::new(
            customization_id,
            DomainEventKind::CustomizationReset,
            actor,
            "Modifications cleared",
        ))
        .await?;
        Ok(customization)
    }

    /// Copies a customization into a fresh draft against the float's
    /// current values.
    pub async fn duplicate_customization(
        &self,
        customization_id: Uuid,
        actor: &str,
    ) -> Result<FloatCustomization> {
        let mut books = self.books.write().await;
        let source = books.customization(customization_id)?;
        let float = books.float(source.float_id)?;
        ensure_approved(float)?;
        ensure_single_pending(&books, float.id, None)?;

        let copy = FloatCustomization {
            id: Uuid::new_v4(),
            current: FloatTerms::from(float),
            requested_by: actor.to_string(),
            request_date: Utc::now(),
            approval: None,
            rejection: None,
            rejection_reason: None,
            change_log: Vec::new(),
            status: CustomizationStatus::Draft,
            ..source.clone()
        };
        books.customizations.insert(copy.id, copy.clone());

        self.record(DomainEvent::new(
            copy.id,
            DomainEventKind::CustomizationCreated,
            actor,
            "Duplicated from an earlier customization",
        ))
        .await?;
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::approved_float;
    use pettycash_core::{ExceedChange, Float, Priority};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn raise_to_20000(float: &Float) -> NewCustomization {
        NewCustomization {
            float_id: float.id,
            changes: FloatChanges {
                new_float_amount: Some(dec!(20000)),
                exceed: Some(ExceedChange {
                    can_exceed: true,
                    limit: dec!(1000),
                }),
                ..FloatChanges::default()
            },
            reason_for_change: "Higher monthly spend".to_string(),
            priority: Priority::High,
            expected_completion_date: None,
            remarks: None,
            requested_by: "nimal".to_string(),
        }
    }

    #[tokio::test]
    async fn approval_applies_changes_once() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let customization = desk
            .create_customization(raise_to_20000(&float), "nimal")
            .await
            .unwrap();
        assert_eq!(customization.current.initial_amount, dec!(15000));

        desk.submit_customization(customization.id, "nimal").await.unwrap();
        let approved = desk
            .approve_customization(customization.id, "director")
            .await
            .unwrap();
        assert_eq!(approved.status, CustomizationStatus::Approved);
        assert_eq!(approved.change_log.len(), 2);

        let updated = desk.float(float.id).await.unwrap();
        assert_eq!(updated.initial_amount, dec!(20000));
        assert!(updated.can_exceed);
        assert_eq!(updated.exceed_limit, dec!(1000));

        assert!(matches!(
            desk.approve_customization(customization.id, "director").await,
            Err(PettyCashError::InvalidTransition { .. })
        ));
        assert_eq!(desk.audit_trail(float.id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn one_pending_customization_per_float() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let first = desk
            .create_customization(raise_to_20000(&float), "nimal")
            .await
            .unwrap();

        assert!(matches!(
            desk.create_customization(raise_to_20000(&float), "nimal").await,
            Err(PettyCashError::Duplicate(_))
        ));
        assert!(desk.duplicate_customization(first.id, "nimal").await.is_err());

        desk.cancel_customization(first.id, "nimal").await.unwrap();
        let copy = desk.duplicate_customization(first.id, "sunil").await.unwrap();
        assert_eq!(copy.status, CustomizationStatus::Draft);
        assert_eq!(copy.changes, first.changes);
        assert_eq!(copy.requested_by, "sunil");
    }

    #[tokio::test]
    async fn empty_changes_are_refused() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let mut nothing = raise_to_20000(&float);
        nothing.changes = FloatChanges::default();
        assert!(desk.create_customization(nothing, "nimal").await.is_err());

        let draft = desk
            .create_customization(raise_to_20000(&float), "nimal")
            .await
            .unwrap();
        desk.clear_customization_changes(draft.id, "nimal").await.unwrap();
        assert!(matches!(
            desk.submit_customization(draft.id, "nimal").await,
            Err(PettyCashError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn enabling_exceed_needs_a_limit() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let mut unlimited = raise_to_20000(&float);
        unlimited.changes.exceed = Some(ExceedChange {
            can_exceed: true,
            limit: Decimal::ZERO,
        });

        match desk.create_customization(unlimited, "nimal").await {
            Err(PettyCashError::Validation(messages)) => assert_eq!(
                messages,
                vec!["New exceed limit must be greater than zero.".to_string()]
            ),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(desk.customizations(Some(float.id)).await.is_empty());
        assert!(!desk.float(float.id).await.unwrap().can_exceed);
    }

    #[tokio::test]
    async fn rejection_needs_reason_and_can_be_reset() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let customization = desk
            .create_customization(raise_to_20000(&float), "nimal")
            .await
            .unwrap();
        desk.submit_customization(customization.id, "nimal").await.unwrap();

        assert!(desk.reject_customization(customization.id, "", "director").await.is_err());
        let rejected = desk
            .reject_customization(customization.id, "Budget freeze", "director")
            .await
            .unwrap();
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Budget freeze"));
        assert_eq!(desk.float(float.id).await.unwrap().initial_amount, dec!(15000));

        let reset = desk.reset_customization(customization.id, "nimal").await.unwrap();
        assert_eq!(reset.status, CustomizationStatus::Draft);
        assert!(reset.rejection.is_none());
    }
}
