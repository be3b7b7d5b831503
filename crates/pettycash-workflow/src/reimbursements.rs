use chrono::Utc;
use pettycash_core::{
    Breakdown, CashReimbursement, DomainEvent, DomainEventKind, NewReimbursement, PettyCashError,
    ReimbursementAction, ReimbursementStatus, Result, transition,
};
use pettycash_denomination::DenominationTally;
use pettycash_denomination::render::restock_message;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::FloatDesk;
use crate::floats::ensure_approved;

impl FloatDesk {
    /// Opens a top-up request; the amount defaults to the float's
    /// outstanding claims.
    pub async fn create_reimbursement(
        &self,
        new_reimbursement: NewReimbursement,
        actor: &str,
    ) -> Result<CashReimbursement> {
        let mut books = self.books.write().await;
        let float = books.float(new_reimbursement.float_id)?;
        ensure_approved(float)?;
        let outstanding = books.balances(float).outstanding_claims;

        let reimbursement = new_reimbursement.into_reimbursement(outstanding)?;
        books
            .reimbursements
            .insert(reimbursement.id, reimbursement.clone());
        info!(reimbursement_id = %reimbursement.id, amount = %reimbursement.required_amount, %actor, "reimbursement created");
        Ok(reimbursement)
    }

    pub async fn reimbursement(&self, reimbursement_id: Uuid) -> Result<CashReimbursement> {
        self.books
            .read()
            .await
            .reimbursement(reimbursement_id)
            .cloned()
    }

    pub async fn reimbursements(&self, float_id: Option<Uuid>) -> Vec<CashReimbursement> {
        let books = self.books.read().await;
        let mut reimbursements: Vec<CashReimbursement> = books
            .reimbursements
            .values()
            .filter(|reimbursement| float_id.is_none_or(|id| reimbursement.float_id == id))
            .cloned()
            .collect();
        reimbursements.sort_by_key(|reimbursement| reimbursement.request_date);
        reimbursements
    }

    pub async fn submit_reimbursement(
        &self,
        reimbursement_id: Uuid,
        actor: &str,
    ) -> Result<CashReimbursement> {
        self.move_reimbursement(reimbursement_id, ReimbursementAction::Submit, None, actor)
            .await
    }

    pub async fn approve_reimbursement(
        &self,
        reimbursement_id: Uuid,
        actor: &str,
    ) -> Result<CashReimbursement> {
        self.move_reimbursement(reimbursement_id, ReimbursementAction::Approve, None, actor)
            .await
    }

    pub async fn reject_reimbursement(
        &self,
        reimbursement_id: Uuid,
        reason: Option<String>,
        actor: &str,
    ) -> Result<CashReimbursement> {
        self.move_reimbursement(reimbursement_id, ReimbursementAction::Reject, reason, actor)
            .await
    }

    /// Back to draft; approval and receipt details are cleared.
    pub async fn reset_reimbursement(
        &self,
        reimbursement_id: Uuid,
        actor: &str,
    ) -> Result<CashReimbursement> {
        self.move_reimbursement(
            reimbursement_id,
            ReimbursementAction::ResetToDraft,
            None,
            actor,
        )
        .await
    }

    async fn move_reimbursement(
        &self,
        reimbursement_id: Uuid,
        action: ReimbursementAction,
        reason: Option<String>,
        actor: &str,
    ) -> Result<CashReimbursement> {
        let mut books = self.books.write().await;
        let reimbursement = books.reimbursement_mut(reimbursement_id)?;
        reimbursement.status = transition("cash reimbursement", reimbursement.status, action)?;

        let (kind, mut body) = match action {
            ReimbursementAction::Submit => (
                DomainEventKind::ReimbursementSubmitted,
                format!("Reimbursement of Rs. {} submitted", reimbursement.required_amount),
            ),
            ReimbursementAction::Approve => {
                reimbursement.is_manager_approved = true;
                reimbursement.approved_by = Some(actor.to_string());
                reimbursement.approval_date = Some(Utc::now());
                (DomainEventKind::ReimbursementApproved, "Approved".to_string())
            }
            ReimbursementAction::Reject => {
                (DomainEventKind::ReimbursementRejected, "Rejected".to_string())
            }
            ReimbursementAction::ResetToDraft => {
                reimbursement.is_manager_approved = false;
                reimbursement.approved_by = None;
                reimbursement.approval_date = None;
                reimbursement.cash_received_by_handler = false;
                reimbursement.received_voucher_ref = None;
                reimbursement.received_breakdown = None;
                (DomainEventKind::ReimbursementReset, "Reset to draft".to_string())
            }
            ReimbursementAction::Complete => {
                (DomainEventKind::ReimbursementCompleted, "Completed".to_string())
            }
        };
        if let Some(reason) = reason.filter(|reason| !reason.trim().is_empty()) {
            body.push_str(": ");
            body.push_str(reason.trim());
        }
        let reimbursement = reimbursement.clone();

        self.record(DomainEvent::new(reimbursement_id, kind, actor, body))
            .await?;
        info!(%reimbursement_id, status = %reimbursement.status, %actor, "reimbursement moved");
        Ok(reimbursement)
    }

    /// The handler counts the cash received for an approved reimbursement.
    pub async fn receive_reimbursement_cash(
        &self,
        reimbursement_id: Uuid,
        received: Breakdown,
        voucher_ref: Option<String>,
        actor: &str,
    ) -> Result<CashReimbursement> {
        let mut books = self.books.write().await;
        let reimbursement = books.reimbursement_mut(reimbursement_id)?;
        if reimbursement.status != ReimbursementStatus::Approved {
            return Err(PettyCashError::InvalidTransition {
                entity: "cash reimbursement",
                action: "receive cash for",
                status: reimbursement.status.to_string(),
            });
        }
        if received.is_empty() {
            return Err(PettyCashError::invalid(
                "Enter the notes and coins received.",
            ));
        }

        reimbursement.received_breakdown = Some(received);
        reimbursement.cash_received_by_handler = true;
        if let Some(voucher) = voucher_ref.filter(|voucher| !voucher.trim().is_empty()) {
            reimbursement.received_voucher_ref = Some(voucher.trim().to_string());
        }
        let reimbursement = reimbursement.clone();

        self.record(
            DomainEvent::new(
                reimbursement_id,
                DomainEventKind::ReimbursementCashReceived,
                actor,
                format!("Cash received: Rs. {}", received.total()),
            )
            .with_payload(json!({ "received": received })),
        )
        .await?;
        Ok(reimbursement)
    }

    /// Closes the reimbursement and puts the received notes back into the
    /// float's stock.
    pub async fn complete_reimbursement(
        &self,
        reimbursement_id: Uuid,
        actor: &str,
    ) -> Result<CashReimbursement> {
        let mut books = self.books.write().await;
        let reimbursement = books.reimbursement(reimbursement_id)?;
        let next = transition(
            "cash reimbursement",
            reimbursement.status,
            ReimbursementAction::Complete,
        )?;
        let received = match reimbursement.received_breakdown {
            Some(received) if reimbursement.cash_received_by_handler && !received.is_empty() => {
                received
            }
            _ => {
                return Err(PettyCashError::invalid(
                    "Confirm the cash received before completing the reimbursement.",
                ));
            }
        };
        let float_id = reimbursement.float_id;

        books
            .tallies
            .entry(float_id)
            .or_insert_with(|| DenominationTally::new(float_id, Breakdown::new()))
            .restock(&received);

        let reimbursement = books.reimbursement_mut(reimbursement_id)?;
        reimbursement.status = next;
        let reimbursement = reimbursement.clone();

        self.record(
            DomainEvent::new(
                reimbursement_id,
                DomainEventKind::ReimbursementCompleted,
                actor,
                restock_message(&received),
            )
            .with_payload(json!({ "received": received, "float_id": float_id })),
        )
        .await?;
        info!(%reimbursement_id, %float_id, amount = %received.total(), "float restocked");
        Ok(reimbursement)
    }
}
