use chrono::Utc;
use pettycash_core::money::ensure_matches;
use pettycash_core::{
    BillAction, BillSettlement, BillStatus, CashRequest, DomainEvent, DomainEventKind, NewBill,
    PettyCashError, RequestKind, RequestStatus, Result, transition,
};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::FloatDesk;

/// Petty cash claims collect receipts before cash goes out; IOUs after.
fn accepts_bills(request: &CashRequest) -> bool {
    match request.kind {
        RequestKind::PettyCash => matches!(
            request.status,
            RequestStatus::Draft
                | RequestStatus::Requested
                | RequestStatus::HodApproved
                | RequestStatus::FloatManagerApproved
        ),
        RequestKind::Iou => request.status == RequestStatus::PendingBillSubmission,
    }
}

impl FloatDesk {
    pub async fn add_bill(
        &self,
        request_id: Uuid,
        new_bill: NewBill,
        actor: &str,
    ) -> Result<BillSettlement> {
        let mut books = self.books.write().await;
        let request = books.request_mut(request_id)?;
        if !accepts_bills(request) {
            return Err(PettyCashError::InvalidTransition {
                entity: request.kind.entity_name(),
                action: "add bills to",
                status: request.status.to_string(),
            });
        }

        let bill = new_bill.into_bill(request_id)?;
        request.bills.push(bill.clone());

        self.record(DomainEvent::new(
            request_id,
            DomainEventKind::BillAdded,
            actor,
            format!("{} bill added for Rs. {}", bill.category.label(), bill.amount),
        ))
        .await?;
        Ok(bill)
    }

    pub async fn submit_bills(
        &self,
        request_id: Uuid,
        bill_ids: &[Uuid],
        actor: &str,
    ) -> Result<CashRequest> {
        self.review_bills(request_id, bill_ids, BillAction::Submit, None, actor)
            .await
    }

    /// Submits every draft bill of an IOU at once; together they must
    /// account for the whole advance.
    pub async fn submit_all_draft_bills(&self, request_id: Uuid, actor: &str) -> Result<CashRequest> {
        let draft_ids: Vec<Uuid> = {
            let books = self.books.read().await;
            let request = books.request(request_id)?;
            if request.kind != RequestKind::Iou {
                return Err(PettyCashError::invalid(
                    "Only IOU requests submit all draft bills at once.",
                ));
            }
            if request.status != RequestStatus::PendingBillSubmission {
                return Err(PettyCashError::InvalidTransition {
                    entity: request.kind.entity_name(),
                    action: "submit bills for",
                    status: request.status.to_string(),
                });
            }

            let drafts: Vec<&BillSettlement> = request
                .bills
                .iter()
                .filter(|bill| bill.status == BillStatus::Draft)
                .collect();
            if drafts.is_empty() {
                return Err(PettyCashError::invalid("There are no draft bills to submit."));
            }
            let total: Decimal = drafts.iter().map(|bill| bill.amount).sum();
            ensure_matches("Total bill amount", request.amount, total)?;
            drafts.iter().map(|bill| bill.id).collect()
        };

        self.review_bills(request_id, &draft_ids, BillAction::Submit, None, actor)
            .await
    }

    pub async fn approve_bills(
        &self,
        request_id: Uuid,
        bill_ids: &[Uuid],
        actor: &str,
    ) -> Result<CashRequest> {
        self.review_bills(request_id, bill_ids, BillAction::Approve, None, actor)
            .await
    }

    pub async fn reject_bills(
        &self,
        request_id: Uuid,
        bill_ids: &[Uuid],
        reason: &str,
        actor: &str,
    ) -> Result<CashRequest> {
        if reason.trim().is_empty() {
            return Err(PettyCashError::invalid(
                "Provide a reason for rejecting the bills.",
            ));
        }
        self.review_bills(request_id, bill_ids, BillAction::Reject, Some(reason.trim()), actor)
            .await
    }

    /// Moves every selected bill, or none of them.
    async fn review_bills(
        &self,
        request_id: Uuid,
        bill_ids: &[Uuid],
        action: BillAction,
        reason: Option<&str>,
        actor: &str,
    ) -> Result<CashRequest> {
        if bill_ids.is_empty() {
            return Err(PettyCashError::invalid("Select at least one bill."));
        }

        let mut books = self.books.write().await;
        let request = books.request_mut(request_id)?;
        let mut moves = Vec::with_capacity(bill_ids.len());
        for bill_id in bill_ids {
            let bill = request.bill(*bill_id)?;
            moves.push((bill.id, transition("bill", bill.status, action)?));
        }

        let now = Utc::now();
        let mut total = Decimal::ZERO;
        for (bill_id, next) in moves {
            let bill = request.bill_mut(bill_id)?;
            bill.status = next;
            total += bill.amount;
            if action != BillAction::Submit {
                bill.reviewed_by = Some(actor.to_string());
                bill.reviewed_at = Some(now);
            }
            if let Some(reason) = reason {
                bill.rejection_reason = Some(reason.to_string());
            }
        }
        let request = request.clone();

        let (kind, verb) = match action {
            BillAction::Submit => (DomainEventKind::BillsSubmitted, "submitted"),
            BillAction::Approve => (DomainEventKind::BillsApproved, "approved"),
            BillAction::Reject => (DomainEventKind::BillsRejected, "rejected"),
        };
        let mut body = format!("{} bill(s) {verb}, Rs. {total}", bill_ids.len());
        if let Some(reason) = reason {
            body.push_str(&format!(". Reason: {reason}"));
        }
        self.record(
            DomainEvent::new(request_id, kind, actor, body)
                .with_payload(json!({ "bill_ids": bill_ids, "total": total })),
        )
        .await?;
        info!(%request_id, count = bill_ids.len(), %verb, "bills reviewed");
        Ok(request)
    }
}
