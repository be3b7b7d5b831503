use chrono::Utc;
use pettycash_core::money::ensure_matches;
use pettycash_core::{
    Approval, Breakdown, CashIssue, CashRequest, DomainEvent, DomainEventKind, NewCashRequest,
    PettyCashError, RequestAction, RequestKind, RequestStatus, Result, Violations, transition,
};
use pettycash_denomination::{DenominationTally, allocate_from_stock};
use pettycash_denomination::render::cash_issue_message;
use pettycash_finance::{ensure_settled, ensure_within_float};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::FloatDesk;
use crate::books::Books;
use crate::floats::ensure_approved;

/// Notes and coins counted out by the custodian.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashIssueInput {
    pub issued: Breakdown,
    #[serde(default)]
    pub change_returned: Breakdown,
}

impl FloatDesk {
    pub async fn create_request(
        &self,
        new_request: NewCashRequest,
        actor: &str,
    ) -> Result<CashRequest> {
        let mut books = self.books.write().await;
        books.float(new_request.float_id)?;
        let request = new_request.into_request(&books.config())?;
        books.requests.insert(request.id, request.clone());

        self.record(DomainEvent::new(
            request.id,
            DomainEventKind::RequestCreated,
            actor,
            format!("{} created for Rs. {}", capitalize(request.kind.entity_name()), request.amount),
        ))
        .await?;
        info!(request_id = %request.id, kind = %request.kind, amount = %request.amount, "cash request created");
        Ok(request)
    }

    pub async fn request(&self, request_id: Uuid) -> Result<CashRequest> {
        self.books.read().await.request(request_id).cloned()
    }

    /// Requests, optionally narrowed to one float, oldest first.
    pub async fn requests(&self, float_id: Option<Uuid>) -> Vec<CashRequest> {
        let books = self.books.read().await;
        let mut requests: Vec<CashRequest> = books
            .requests
            .values()
            .filter(|request| float_id.is_none_or(|id| request.float_id == id))
            .cloned()
            .collect();
        requests.sort_by_key(|request| request.request_date);
        requests
    }

    pub async fn submit_request(&self, request_id: Uuid, actor: &str) -> Result<CashRequest> {
        let mut books = self.books.write().await;
        let request = books.request(request_id)?;
        let next = transition(
            request.kind.entity_name(),
            request.status,
            RequestAction::Submit,
        )?;
        request.validate()?;

        let float = books.float(request.float_id)?;
        ensure_approved(float)?;
        let config = books.config();
        if request.department != float.department
            && !(config.allow_cross_department || float.allow_cross_department)
        {
            return Err(PettyCashError::invalid(format!(
                "Requests from {} cannot draw on float \"{}\" of {}.",
                request.department, float.name, float.department
            )));
        }
        ensure_within_float(float, &books.balances(float), request.amount)?;

        let request = books.request_mut(request_id)?;
        request.status = next;
        let request = request.clone();

        self.record(DomainEvent::new(
            request_id,
            DomainEventKind::RequestSubmitted,
            actor,
            "Submitted for approval",
        ))
        .await?;
        info!(%request_id, %actor, "cash request submitted");
        Ok(request)
    }

    pub async fn hod_approve(&self, request_id: Uuid, actor: &str) -> Result<CashRequest> {
        self.sign_off(request_id, RequestAction::HodApprove, None, actor)
            .await
    }

    pub async fn hod_reject(
        &self,
        request_id: Uuid,
        reason: Option<String>,
        actor: &str,
    ) -> Result<CashRequest> {
        self.sign_off(request_id, RequestAction::HodReject, reason, actor)
            .await
    }

    pub async fn float_manager_approve(&self, request_id: Uuid, actor: &str) -> Result<CashRequest> {
        self.sign_off(request_id, RequestAction::FloatManagerApprove, None, actor)
            .await
    }

    pub async fn float_manager_reject(
        &self,
        request_id: Uuid,
        reason: Option<String>,
        actor: &str,
    ) -> Result<CashRequest> {
        self.sign_off(request_id, RequestAction::FloatManagerReject, reason, actor)
            .await
    }

    pub async fn cancel_request(&self, request_id: Uuid, actor: &str) -> Result<CashRequest> {
        self.sign_off(request_id, RequestAction::Cancel, None, actor)
            .await
    }

    /// Sends a rejected request back to draft, dropping both sign-offs.
    pub async fn reset_request(&self, request_id: Uuid, actor: &str) -> Result<CashRequest> {
        self.sign_off(request_id, RequestAction::ResetToDraft, None, actor)
            .await
    }

    async fn sign_off(
        &self,
        request_id: Uuid,
        action: RequestAction,
        reason: Option<String>,
        actor: &str,
    ) -> Result<CashRequest> {
        let mut books = self.books.write().await;
        let request = books.request_mut(request_id)?;
        request.status = transition(request.kind.entity_name(), request.status, action)?;

        let (kind, mut body) = match action {
            RequestAction::HodApprove => {
                request.hod_approval = Some(Approval::now(actor));
                (DomainEventKind::RequestApproved, "Approved by HOD".to_string())
            }
            RequestAction::FloatManagerApprove => {
                request.float_manager_approval = Some(Approval::now(actor));
                (
                    DomainEventKind::RequestApproved,
                    "Approved by Float Manager".to_string(),
                )
            }
            RequestAction::HodReject => (DomainEventKind::RequestRejected, "Rejected by HOD".to_string()),
            RequestAction::FloatManagerReject => (
                DomainEventKind::RequestRejected,
                "Rejected by Float Manager".to_string(),
            ),
            RequestAction::Cancel => (DomainEventKind::RequestCancelled, "Cancelled".to_string()),
            _ => {
                request.hod_approval = None;
                request.float_manager_approval = None;
                (DomainEventKind::RequestReset, "Reset to draft".to_string())
            }
        };
        if let Some(reason) = reason.filter(|reason| !reason.trim().is_empty()) {
            body.push_str(": ");
            body.push_str(reason.trim());
        }
        let request = request.clone();

        self.record(DomainEvent::new(request_id, kind, actor, body))
            .await?;
        info!(%request_id, status = %request.status, %actor, "cash request moved");
        Ok(request)
    }

    /// Proposes which notes to hand over, drawn from the float's stock.
    pub async fn suggest_cash_issue(&self, request_id: Uuid) -> Result<Breakdown> {
        let books = self.books.read().await;
        let request = books.request(request_id)?;
        allocate_from_stock(request.amount, &stock_of(&books, request.float_id)?.counts)
    }

    /// Hands cash over: stock loses the issued notes and gains any change.
    pub async fn issue_cash(
        &self,
        request_id: Uuid,
        input: CashIssueInput,
        actor: &str,
    ) -> Result<CashRequest> {
        let mut books = self.books.write().await;
        let request = books.request(request_id)?;
        let kind = request.kind;
        let next = transition(
            kind.entity_name(),
            request.status,
            RequestAction::IssueCash(kind),
        )?;
        if !request.is_hod_approved() {
            return Err(PettyCashError::MissingApproval("HOD"));
        }
        if !request.is_float_manager_approved() {
            return Err(PettyCashError::MissingApproval("Float manager"));
        }
        if kind == RequestKind::PettyCash {
            ensure_settled(request)?;
        }
        if input.issued.is_empty() {
            return Err(PettyCashError::invalid(
                "Enter the notes and coins handed over.",
            ));
        }
        ensure_matches(
            "Cash issued less balance given",
            request.amount,
            input.issued.total() - input.change_returned.total(),
        )?;
        let float_id = request.float_id;
        stock_of(&books, float_id)?.ensure_available(&input.issued)?;

        let tally = books.tally_mut(float_id)?;
        tally.deduct(&input.issued)?;
        tally.restock(&input.change_returned);

        let issue = CashIssue {
            issued: input.issued,
            change_returned: input.change_returned,
            issued_by: actor.to_string(),
            issued_at: Utc::now(),
        };
        let body = cash_issue_message(&issue);
        let request = books.request_mut(request_id)?;
        request.cash_issue = Some(issue);
        request.status = next;
        let request = request.clone();

        self.record(
            DomainEvent::new(request_id, DomainEventKind::CashIssued, actor, body).with_payload(
                json!({
                    "issued": input.issued,
                    "change_returned": input.change_returned,
                }),
            ),
        )
        .await?;
        info!(%request_id, %float_id, amount = %request.amount, "cash issued");
        Ok(request)
    }

    /// Employee acknowledges the cash, optionally with the signed voucher.
    pub async fn confirm_cash_received(
        &self,
        request_id: Uuid,
        voucher_ref: Option<String>,
        actor: &str,
    ) -> Result<CashRequest> {
        let mut books = self.books.write().await;
        let request = books.request_mut(request_id)?;
        if !matches!(
            request.status,
            RequestStatus::CashIssued | RequestStatus::PendingBillSubmission
        ) {
            return Err(PettyCashError::InvalidTransition {
                entity: request.kind.entity_name(),
                action: "confirm cash receipt for",
                status: request.status.to_string(),
            });
        }

        request.cash_received_by_employee = true;
        if let Some(voucher) = voucher_ref.filter(|voucher| !voucher.trim().is_empty()) {
            request.received_voucher_ref = Some(voucher.trim().to_string());
        }
        let request = request.clone();

        self.record(DomainEvent::new(
            request_id,
            DomainEventKind::CashReceiptConfirmed,
            actor,
            "Cash received by employee",
        ))
        .await?;
        Ok(request)
    }

    pub async fn complete_request(&self, request_id: Uuid, actor: &str) -> Result<CashRequest> {
        let mut books = self.books.write().await;
        let request = books.request_mut(request_id)?;
        let kind = request.kind;
        let next = transition(kind.entity_name(), request.status, RequestAction::Complete(kind))?;

        match kind {
            RequestKind::PettyCash => {
                let mut violations = Violations::new();
                violations.check(
                    request.cash_received_by_employee,
                    "Confirm that the employee received the cash.",
                );
                violations.check(
                    request.received_voucher_ref.is_some(),
                    "Attach the signed received voucher.",
                );
                violations.into_result()?;
            }
            RequestKind::Iou => ensure_settled(request)?,
        }

        request.status = next;
        let request = request.clone();

        self.record(
            DomainEvent::new(request_id, DomainEventKind::RequestCompleted, actor, "Completed")
                .with_payload(json!({ "settlement_amount": request.settlement_amount() })),
        )
        .await?;
        info!(%request_id, kind = %kind, "cash request completed");
        Ok(request)
    }
}

/// The float's notes and coins; cash cannot move before they are counted in.
fn stock_of(books: &Books, float_id: Uuid) -> Result<&DenominationTally> {
    match books.tallies.get(&float_id) {
        Some(tally) => Ok(tally),
        None => Err(PettyCashError::invalid(format!(
            "Float \"{}\" has no initial denomination set. Record its notes and coins before issuing cash.",
            books.float(float_id)?.name
        ))),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{admin_float, approved_float, approved_request, iou, petty_cash, settle};
    use pettycash_core::{PettyCashConfig, Tier};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn notes_for_2300() -> CashIssueInput {
        CashIssueInput {
            issued: Breakdown::new().with(Tier::Note1000, 2).with(Tier::Note100, 3),
            change_returned: Breakdown::new(),
        }
    }

    #[tokio::test]
    async fn petty_cash_disbursement_updates_balance_and_stock() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = approved_request(&desk, petty_cash(&float, dec!(2300))).await;
        settle(&desk, request.id, dec!(2300)).await;

        let request = desk
            .issue_cash(request.id, notes_for_2300(), "nimal")
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::CashIssued);

        let balances = desk.float_balances(float.id).await.unwrap();
        assert_eq!(balances.current_balance, dec!(12700));

        let stock = desk.denomination(float.id).await.unwrap().counts;
        assert_eq!(stock.get(Tier::Note1000), 5);
        assert_eq!(stock.get(Tier::Note100), 7);
        assert_eq!(stock.get(Tier::Note5000), 1);
        assert_eq!(stock.total(), dec!(12700));
    }

    #[tokio::test]
    async fn cash_issue_needs_an_initial_denomination() {
        let desk = FloatDesk::in_memory();
        let float = desk.create_float(admin_float(dec!(15000)), "nimal").await.unwrap();
        desk.submit_float(float.id, "nimal").await.unwrap();
        desk.approve_float(float.id, "director").await.unwrap();

        let request = approved_request(&desk, petty_cash(&float, dec!(2300))).await;
        settle(&desk, request.id, dec!(2300)).await;

        match desk.issue_cash(request.id, notes_for_2300(), "nimal").await {
            Err(PettyCashError::Validation(messages)) => {
                assert!(messages[0].contains("has no initial denomination set"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(desk.suggest_cash_issue(request.id).await.is_err());
        assert_eq!(
            desk.request(request.id).await.unwrap().status,
            RequestStatus::FloatManagerApproved
        );
        assert!(desk.denomination(float.id).await.is_err());
    }

    #[tokio::test]
    async fn no_cash_issue_without_matching_settlement() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = approved_request(&desk, petty_cash(&float, dec!(2300))).await;
        settle(&desk, request.id, dec!(2000)).await;

        let err = desk
            .issue_cash(request.id, notes_for_2300(), "nimal")
            .await
            .unwrap_err();
        assert!(matches!(err, PettyCashError::AmountMismatch { .. }));
        assert_eq!(desk.denomination(float.id).await.unwrap().counts, crate::fixtures::opening_stock());
        assert_eq!(
            desk.request(request.id).await.unwrap().status,
            RequestStatus::FloatManagerApproved
        );
    }

    #[tokio::test]
    async fn issued_cash_must_net_to_the_amount() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = approved_request(&desk, petty_cash(&float, dec!(2300))).await;
        settle(&desk, request.id, dec!(2300)).await;

        let over = CashIssueInput {
            issued: Breakdown::new().with(Tier::Note1000, 3),
            change_returned: Breakdown::new(),
        };
        assert!(desk.issue_cash(request.id, over, "nimal").await.is_err());

        let with_change = CashIssueInput {
            issued: Breakdown::new().with(Tier::Note1000, 3),
            change_returned: Breakdown::new().with(Tier::Note100, 7),
        };
        desk.issue_cash(request.id, with_change, "nimal").await.unwrap();

        let stock = desk.denomination(float.id).await.unwrap().counts;
        assert_eq!(stock.get(Tier::Note1000), 4);
        assert_eq!(stock.get(Tier::Note100), 17);
    }

    #[tokio::test]
    async fn cash_issue_fails_when_a_tier_runs_out() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = approved_request(&desk, iou(&float, dec!(2000))).await;

        let coins = CashIssueInput {
            issued: Breakdown::new().with(Tier::Coin10, 200),
            change_returned: Breakdown::new(),
        };
        let err = desk.issue_cash(request.id, coins, "nimal").await.unwrap_err();
        assert!(matches!(
            err,
            PettyCashError::InsufficientDenomination {
                tier: Tier::Coin10,
                requested: 200,
                available: 0
            }
        ));
    }

    #[tokio::test]
    async fn suggested_notes_come_from_stock() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = approved_request(&desk, iou(&float, dec!(6800))).await;

        let suggestion = desk.suggest_cash_issue(request.id).await.unwrap();
        assert_eq!(
            suggestion,
            Breakdown::new()
                .with(Tier::Note5000, 1)
                .with(Tier::Note1000, 1)
                .with(Tier::Note500, 1)
                .with(Tier::Note100, 3)
        );
    }

    #[tokio::test]
    async fn balance_after_several_disbursements() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let amounts = [dec!(1000), dec!(500), dec!(2000)];

        for amount in amounts {
            let request = approved_request(&desk, petty_cash(&float, amount)).await;
            settle(&desk, request.id, amount).await;
            let issued = desk.suggest_cash_issue(request.id).await.unwrap();
            desk.issue_cash(
                request.id,
                CashIssueInput {
                    issued,
                    change_returned: Breakdown::new(),
                },
                "nimal",
            )
            .await
            .unwrap();
        }

        let spent: Decimal = amounts.iter().sum();
        let balances = desk.float_balances(float.id).await.unwrap();
        assert_eq!(balances.current_balance, dec!(15000) - spent);
        assert_eq!(desk.denomination(float.id).await.unwrap().total(), dec!(15000) - spent);
    }

    #[tokio::test]
    async fn iou_completes_once_bills_cover_the_advance() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = approved_request(&desk, iou(&float, dec!(2300))).await;
        let request = desk
            .issue_cash(request.id, notes_for_2300(), "nimal")
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::PendingBillSubmission);

        let balances = desk.float_balances(float.id).await.unwrap();
        assert_eq!(balances.current_balance, dec!(15000));
        assert_eq!(balances.cash_in_hand, dec!(12700));

        assert!(desk.complete_request(request.id, "nimal").await.is_err());
        settle(&desk, request.id, dec!(2300)).await;
        let request = desk.complete_request(request.id, "nimal").await.unwrap();
        assert_eq!(request.status, RequestStatus::Completed);

        let balances = desk.float_balances(float.id).await.unwrap();
        assert_eq!(balances.current_balance, dec!(12700));
        assert_eq!(balances.iou_exposure, Decimal::ZERO);
    }

    #[tokio::test]
    async fn petty_cash_completion_needs_receipt_and_voucher() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = approved_request(&desk, petty_cash(&float, dec!(2300))).await;
        settle(&desk, request.id, dec!(2300)).await;
        desk.issue_cash(request.id, notes_for_2300(), "nimal")
            .await
            .unwrap();

        match desk.complete_request(request.id, "nimal").await {
            Err(PettyCashError::Validation(messages)) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected result: {other:?}"),
        }

        desk.confirm_cash_received(request.id, Some("voucher-17.pdf".to_string()), "kasun")
            .await
            .unwrap();
        let request = desk.complete_request(request.id, "nimal").await.unwrap();
        assert_eq!(request.status, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn submit_requires_approved_float() {
        let desk = FloatDesk::in_memory();
        let float = desk
            .create_float(admin_float(dec!(5000)), "nimal")
            .await
            .unwrap();
        let request = desk
            .create_request(petty_cash(&float, dec!(100)), "kasun")
            .await
            .unwrap();

        assert!(desk.submit_request(request.id, "kasun").await.is_err());
        assert_eq!(
            desk.request(request.id).await.unwrap().status,
            RequestStatus::Draft
        );
    }

    #[tokio::test]
    async fn cross_department_requests_need_permission() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let mut new_request = petty_cash(&float, dec!(100));
        new_request.department = "Finance".to_string();
        let request = desk.create_request(new_request, "kasun").await.unwrap();

        assert!(desk.submit_request(request.id, "kasun").await.is_err());

        desk.save_configuration(
            PettyCashConfig {
                allow_cross_department: true,
                ..PettyCashConfig::default()
            },
            "admin",
        )
        .await
        .unwrap();
        desk.submit_request(request.id, "kasun").await.unwrap();
    }

    #[tokio::test]
    async fn requests_beyond_cash_in_hand_are_refused_unless_float_may_exceed() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = desk
            .create_request(petty_cash(&float, dec!(16000)), "kasun")
            .await
            .unwrap();
        assert!(desk.submit_request(request.id, "kasun").await.is_err());

        let mut can_exceed = admin_float(dec!(15000));
        can_exceed.can_exceed = true;
        let roomy = desk.create_float(can_exceed, "nimal").await.unwrap();
        desk.submit_float(roomy.id, "nimal").await.unwrap();
        desk.approve_float(roomy.id, "director").await.unwrap();

        let request = desk
            .create_request(petty_cash(&roomy, dec!(16000)), "kasun")
            .await
            .unwrap();
        desk.submit_request(request.id, "kasun").await.unwrap();
    }

    #[tokio::test]
    async fn rejected_request_resets_without_approvals() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = desk
            .create_request(petty_cash(&float, dec!(100)), "kasun")
            .await
            .unwrap();
        desk.submit_request(request.id, "kasun").await.unwrap();
        desk.hod_approve(request.id, "hod").await.unwrap();
        let rejected = desk
            .float_manager_reject(request.id, Some("No receipt".to_string()), "nimal")
            .await
            .unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);

        let reset = desk.reset_request(request.id, "kasun").await.unwrap();
        assert_eq!(reset.status, RequestStatus::Draft);
        assert!(!reset.is_hod_approved());

        let trail = desk.audit_trail(request.id).await.unwrap();
        assert!(trail.iter().any(|entry| entry.event.body == "Rejected by Float Manager: No receipt"));
    }

    #[tokio::test]
    async fn approved_requests_cannot_be_cancelled() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let request = approved_request(&desk, petty_cash(&float, dec!(100))).await;
        assert!(matches!(
            desk.cancel_request(request.id, "kasun").await,
            Err(PettyCashError::InvalidTransition { .. })
        ));
    }
}
