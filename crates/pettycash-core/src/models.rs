use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::denomination::Breakdown;
use crate::error::{PettyCashError, Result, Violations};
use crate::money::{format_amount, max_amount, within_limit};
use crate::status::{
    BillStatus, CustomizationStatus, FloatStatus, ReimbursementStatus, RequestKind, RequestStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub by: String,
    pub at: DateTime<Utc>,
}

impl Approval {
    pub fn now(by: &str) -> Self {
        Self {
            by: by.to_string(),
            at: Utc::now(),
        }
    }
}

/// A department's cash pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Float {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    pub initial_amount: Decimal,
    pub can_exceed: bool,
    pub exceed_limit: Decimal,
    pub exceed_margin_percentage: Decimal,
    pub allow_cross_department: bool,
    pub float_manager: String,
    pub date_created: NaiveDate,
    pub remarks: Option<String>,
    pub attachment_ref: Option<String>,
    pub status: FloatStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFloat {
    pub name: String,
    pub department: String,
    pub initial_amount: Decimal,
    #[serde(default)]
    pub can_exceed: bool,
    #[serde(default)]
    pub exceed_limit: Decimal,
    pub exceed_margin_percentage: Option<Decimal>,
    #[serde(default)]
    pub allow_cross_department: bool,
    pub float_manager: String,
    pub remarks: Option<String>,
    pub attachment_ref: Option<String>,
}

fn too_large(field: &str) -> String {
    format!("{field} cannot exceed {}.", format_amount(max_amount()))
}

pub fn default_exceed_margin() -> Decimal {
    Decimal::new(100, 1) // 10.0%
}

impl NewFloat {
    pub fn into_float(self) -> Result<Float> {
        let margin = self
            .exceed_margin_percentage
            .unwrap_or_else(default_exceed_margin);

        let mut violations = Violations::new();
        violations.check(!self.name.trim().is_empty(), "Float name is required.");
        violations.check(!self.department.trim().is_empty(), "Department is required.");
        violations.check(
            self.initial_amount > Decimal::ZERO,
            "Initial float amount must be greater than zero.",
        );
        violations.check(within_limit(self.initial_amount), too_large("Initial float amount"));
        violations.check(
            self.exceed_limit >= Decimal::ZERO,
            "Exceed limit cannot be negative.",
        );
        violations.check(within_limit(self.exceed_limit), too_large("Exceed limit"));
        violations.check(
            margin >= Decimal::ZERO && margin <= Decimal::ONE_HUNDRED,
            "Exceed margin percentage must be between 0 and 100.",
        );
        violations.check(
            !self.float_manager.trim().is_empty(),
            "Float manager is required.",
        );
        violations.into_result()?;

        Ok(Float {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            department: self.department.trim().to_string(),
            initial_amount: self.initial_amount,
            can_exceed: self.can_exceed,
            exceed_limit: self.exceed_limit,
            exceed_margin_percentage: margin,
            allow_cross_department: self.allow_cross_department,
            float_manager: self.float_manager.trim().to_string(),
            date_created: Utc::now().date_naive(),
            remarks: self.remarks,
            attachment_ref: self.attachment_ref,
            status: FloatStatus::Draft,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Accommodation,
    Taxi,
    Fuel,
    Stationery,
    Other,
}

impl ExpenseCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Accommodation => "Accommodation",
            Self::Taxi => "Taxi",
            Self::Fuel => "Fuel",
            Self::Stationery => "Stationery",
            Self::Other => "Other",
        }
    }
}

/// One receipt reconciling part of a request's claimed amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillSettlement {
    pub id: Uuid,
    pub request_id: Uuid,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub receipt_ref: Option<String>,
    pub description: Option<String>,
    pub status: BillStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBill {
    pub date: Option<NaiveDate>,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub receipt_ref: Option<String>,
    pub description: Option<String>,
}

impl NewBill {
    pub fn into_bill(self, request_id: Uuid) -> Result<BillSettlement> {
        if self.amount <= Decimal::ZERO {
            return Err(PettyCashError::invalid("The amount must be positive."));
        }
        if !within_limit(self.amount) {
            return Err(PettyCashError::invalid(too_large("Bill amount")));
        }

        Ok(BillSettlement {
            id: Uuid::new_v4(),
            request_id,
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            category: self.category,
            amount: self.amount,
            receipt_ref: self.receipt_ref,
            description: self.description,
            status: BillStatus::Draft,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
        })
    }
}

/// Cash physically handed over for a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashIssue {
    pub issued: Breakdown,
    pub change_returned: Breakdown,
    pub issued_by: String,
    pub issued_at: DateTime<Utc>,
}

impl CashIssue {
    pub fn net_amount(&self) -> Decimal {
        self.issued.total() - self.change_returned.total()
    }
}

/// A petty cash expense claim or an IOU advance against a float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRequest {
    pub id: Uuid,
    pub kind: RequestKind,
    pub float_id: Uuid,
    pub requested_by: String,
    pub department: String,
    pub request_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub reason_in_advance: Option<String>,
    pub remarks: Option<String>,
    pub request_voucher_ref: Option<String>,
    pub hod_approval: Option<Approval>,
    pub float_manager_approval: Option<Approval>,
    pub cash_issue: Option<CashIssue>,
    pub cash_received_by_employee: bool,
    pub received_voucher_ref: Option<String>,
    pub bills: Vec<BillSettlement>,
    pub status: RequestStatus,
}

impl CashRequest {
    pub fn is_hod_approved(&self) -> bool {
        self.hod_approval.is_some()
    }

    pub fn is_float_manager_approved(&self) -> bool {
        self.float_manager_approval.is_some()
    }

    /// Total of approved bills.
    pub fn settlement_amount(&self) -> Decimal {
        self.bills
            .iter()
            .filter(|bill| bill.status == BillStatus::Approved)
            .map(|bill| bill.amount)
            .sum()
    }

    /// Latest approved bill date.
    pub fn settlement_date(&self) -> Option<NaiveDate> {
        self.bills
            .iter()
            .filter(|bill| bill.status == BillStatus::Approved)
            .map(|bill| bill.date)
            .max()
    }

    pub fn bill(&self, bill_id: Uuid) -> Result<&BillSettlement> {
        self.bills
            .iter()
            .find(|bill| bill.id == bill_id)
            .ok_or_else(|| PettyCashError::not_found("bill", bill_id))
    }

    pub fn bill_mut(&mut self, bill_id: Uuid) -> Result<&mut BillSettlement> {
        self.bills
            .iter_mut()
            .find(|bill| bill.id == bill_id)
            .ok_or_else(|| PettyCashError::not_found("bill", bill_id))
    }

    /// The record-level checks every saved request must satisfy.
    pub fn validate(&self) -> Result<()> {
        let mut violations = Violations::new();
        violations.check(
            self.amount > Decimal::ZERO,
            "Request amount must be greater than zero. Please enter a valid amount.",
        );
        violations.check(within_limit(self.amount), too_large("Request amount"));
        violations.check(
            self.due_date >= self.request_date,
            "Due date cannot be earlier than request date. Please select a valid due date.",
        );
        if self.kind == RequestKind::Iou {
            violations.check(
                self.reason_in_advance
                    .as_deref()
                    .is_some_and(|reason| !reason.trim().is_empty()),
                "Provide a reason for requesting the IOU in advance.",
            );
        }
        violations.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCashRequest {
    pub kind: RequestKind,
    pub float_id: Uuid,
    pub requested_by: String,
    pub department: String,
    pub request_date: Option<DateTime<Utc>>,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub reason_in_advance: Option<String>,
    pub remarks: Option<String>,
    pub request_voucher_ref: Option<String>,
}

impl NewCashRequest {
    pub fn into_request(self, config: &PettyCashConfig) -> Result<CashRequest> {
        if self.requested_by.trim().is_empty() {
            return Err(PettyCashError::invalid("Requester is required."));
        }

        let request_date = self.request_date.unwrap_or_else(Utc::now);
        let due_date = request_date + Duration::days(i64::from(config.due_days_for(self.kind)));

        let request = CashRequest {
            id: Uuid::new_v4(),
            kind: self.kind,
            float_id: self.float_id,
            requested_by: self.requested_by.trim().to_string(),
            department: self.department.trim().to_string(),
            request_date,
            due_date,
            amount: self.amount,
            category: self.category,
            reason_in_advance: self.reason_in_advance,
            remarks: self.remarks,
            request_voucher_ref: self.request_voucher_ref,
            hod_approval: None,
            float_manager_approval: None,
            cash_issue: None,
            cash_received_by_employee: false,
            received_voucher_ref: None,
            bills: Vec::new(),
            status: RequestStatus::Draft,
        };
        request.validate()?;
        Ok(request)
    }
}

/// A request to top a float's physical cash back up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashReimbursement {
    pub id: Uuid,
    pub float_id: Uuid,
    pub request_date: DateTime<Utc>,
    pub handler: String,
    pub required_amount: Decimal,
    pub received_breakdown: Option<Breakdown>,
    pub justification: String,
    pub remarks: Option<String>,
    pub attachment_ref: Option<String>,
    pub is_manager_approved: bool,
    pub approved_by: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
    pub cash_received_by_handler: bool,
    pub received_voucher_ref: Option<String>,
    pub report_from: Option<NaiveDate>,
    pub report_to: Option<NaiveDate>,
    pub status: ReimbursementStatus,
}

impl CashReimbursement {
    pub fn received_amount(&self) -> Decimal {
        self.received_breakdown
            .map(|breakdown| breakdown.total())
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReimbursement {
    pub float_id: Uuid,
    pub handler: String,
    /// Defaults to the float's outstanding claims.
    pub required_amount: Option<Decimal>,
    pub justification: String,
    pub remarks: Option<String>,
    pub attachment_ref: Option<String>,
    pub report_from: Option<NaiveDate>,
    pub report_to: Option<NaiveDate>,
}

impl NewReimbursement {
    pub fn into_reimbursement(self, outstanding_claims: Decimal) -> Result<CashReimbursement> {
        let required_amount = self.required_amount.unwrap_or(outstanding_claims);

        let mut violations = Violations::new();
        violations.check(!self.handler.trim().is_empty(), "Handler is required.");
        violations.check(
            required_amount > Decimal::ZERO,
            "Required amount must be greater than zero.",
        );
        violations.check(within_limit(required_amount), too_large("Required amount"));
        violations.check(
            !self.justification.trim().is_empty(),
            "Provide a justification for the reimbursement request.",
        );
        if let (Some(from), Some(to)) = (self.report_from, self.report_to) {
            violations.check(from <= to, "Report from date must not be after report to date.");
        }
        violations.into_result()?;

        Ok(CashReimbursement {
            id: Uuid::new_v4(),
            float_id: self.float_id,
            request_date: Utc::now(),
            handler: self.handler.trim().to_string(),
            required_amount,
            received_breakdown: None,
            justification: self.justification,
            remarks: self.remarks,
            attachment_ref: self.attachment_ref,
            is_manager_approved: false,
            approved_by: None,
            approval_date: None,
            cash_received_by_handler: false,
            received_voucher_ref: None,
            report_from: self.report_from,
            report_to: self.report_to,
            status: ReimbursementStatus::Draft,
        })
    }
}

/// The float settings a customization may change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatTerms {
    pub name: String,
    pub department: String,
    pub initial_amount: Decimal,
    pub can_exceed: bool,
    pub exceed_limit: Decimal,
    pub exceed_margin_percentage: Decimal,
    pub allow_cross_department: bool,
    pub float_manager: String,
}

impl From<&Float> for FloatTerms {
    fn from(float: &Float) -> Self {
        Self {
            name: float.name.clone(),
            department: float.department.clone(),
            initial_amount: float.initial_amount,
            can_exceed: float.can_exceed,
            exceed_limit: float.exceed_limit,
            exceed_margin_percentage: float.exceed_margin_percentage,
            allow_cross_department: float.allow_cross_department,
            float_manager: float.float_manager.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExceedChange {
    pub can_exceed: bool,
    #[serde(default)]
    pub limit: Decimal,
}

/// Staged modifications; `None` leaves the setting untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatChanges {
    pub new_float_amount: Option<Decimal>,
    pub exceed: Option<ExceedChange>,
    pub new_float_manager: Option<String>,
    pub allow_cross_department: Option<bool>,
    pub exceed_margin_percentage: Option<Decimal>,
}

impl FloatChanges {
    pub fn is_empty(&self) -> bool {
        self.new_float_amount.is_none()
            && self.exceed.is_none()
            && self.new_float_manager.is_none()
            && self.allow_cross_department.is_none()
            && self.exceed_margin_percentage.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        let mut violations = Violations::new();
        violations.check(
            !self.is_empty(),
            "Please select at least one modification to make.",
        );
        if let Some(amount) = self.new_float_amount {
            violations.check(
                amount > Decimal::ZERO,
                "New float amount must be greater than zero.",
            );
            violations.check(within_limit(amount), too_large("New float amount"));
        }
        if let Some(exceed) = self.exceed {
            violations.check(
                !exceed.can_exceed || exceed.limit > Decimal::ZERO,
                "New exceed limit must be greater than zero.",
            );
            violations.check(within_limit(exceed.limit), too_large("New exceed limit"));
        }
        if let Some(manager) = &self.new_float_manager {
            violations.check(!manager.trim().is_empty(), "New float manager is required.");
        }
        if let Some(margin) = self.exceed_margin_percentage {
            violations.check(
                margin >= Decimal::ZERO && margin <= Decimal::ONE_HUNDRED,
                "New exceed margin percentage must be between 0 and 100.",
            );
        }
        violations.into_result()
    }

    /// Writes the staged values onto `float` and describes each change.
    pub fn apply_to(&self, float: &mut Float) -> Vec<String> {
        let mut log = Vec::new();

        if let Some(amount) = self.new_float_amount {
            log.push(format!("Float amount: {} → {}", float.initial_amount, amount));
            float.initial_amount = amount;
        }

        if let Some(exceed) = self.exceed {
            let previous = float.can_exceed;
            float.can_exceed = exceed.can_exceed;
            if exceed.can_exceed && !exceed.limit.is_zero() {
                float.exceed_limit = exceed.limit;
                log.push(format!(
                    "Exceed permission: {previous} → {} (Limit: Rs. {})",
                    exceed.can_exceed, exceed.limit
                ));
            } else {
                if !exceed.can_exceed {
                    float.exceed_limit = Decimal::ZERO;
                }
                log.push(format!("Exceed permission: {previous} → {}", exceed.can_exceed));
            }
        }

        if let Some(manager) = &self.new_float_manager {
            log.push(format!("Float manager: {} → {}", float.float_manager, manager));
            float.float_manager = manager.trim().to_string();
        }

        if let Some(allow) = self.allow_cross_department {
            log.push(format!(
                "Cross-department access: {} → {allow}",
                float.allow_cross_department
            ));
            float.allow_cross_department = allow;
        }

        if let Some(margin) = self.exceed_margin_percentage {
            log.push(format!(
                "Exceed margin: {}% → {margin}%",
                float.exceed_margin_percentage
            ));
            float.exceed_margin_percentage = margin;
        }

        log
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// A staged change request against an approved float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatCustomization {
    pub id: Uuid,
    pub float_id: Uuid,
    pub current: FloatTerms,
    pub changes: FloatChanges,
    pub reason_for_change: String,
    pub priority: Priority,
    pub expected_completion_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub requested_by: String,
    pub request_date: DateTime<Utc>,
    pub approval: Option<Approval>,
    pub rejection: Option<Approval>,
    pub rejection_reason: Option<String>,
    pub change_log: Vec<String>,
    pub status: CustomizationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomization {
    pub float_id: Uuid,
    pub changes: FloatChanges,
    pub reason_for_change: String,
    #[serde(default)]
    pub priority: Priority,
    pub expected_completion_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub requested_by: String,
}

impl NewCustomization {
    pub fn into_customization(self, float: &Float) -> Result<FloatCustomization> {
        self.changes.validate()?;
        if self.reason_for_change.trim().is_empty() {
            return Err(PettyCashError::invalid("Explain why these changes are needed."));
        }

        Ok(FloatCustomization {
            id: Uuid::new_v4(),
            float_id: float.id,
            current: FloatTerms::from(float),
            changes: self.changes,
            reason_for_change: self.reason_for_change,
            priority: self.priority,
            expected_completion_date: self.expected_completion_date,
            remarks: self.remarks,
            requested_by: self.requested_by,
            request_date: Utc::now(),
            approval: None,
            rejection: None,
            rejection_reason: None,
            change_log: Vec::new(),
            status: CustomizationStatus::Draft,
        })
    }
}

/// Global settings; the desk keeps at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PettyCashConfig {
    pub name: String,
    pub allow_cross_department: bool,
    pub default_petty_cash_due_days: u32,
    pub default_iou_due_days: u32,
}

impl Default for PettyCashConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            allow_cross_department: false,
            default_petty_cash_due_days: 0,
            default_iou_due_days: 10,
        }
    }
}

impl PettyCashConfig {
    pub fn due_days_for(&self, kind: RequestKind) -> u32 {
        match kind {
            RequestKind::PettyCash => self.default_petty_cash_due_days,
            RequestKind::Iou => self.default_iou_due_days,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PettyCashError::InvalidConfiguration(
                "configuration name is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    pub float_managers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_float() -> NewFloat {
        NewFloat {
            name: "Admin Float".to_string(),
            department: "Administration".to_string(),
            initial_amount: dec!(15000),
            can_exceed: false,
            exceed_limit: Decimal::ZERO,
            exceed_margin_percentage: None,
            allow_cross_department: false,
            float_manager: "nimal".to_string(),
            remarks: None,
            attachment_ref: None,
        }
    }

    #[test]
    fn float_defaults_margin_to_ten_percent() {
        let float = new_float().into_float().unwrap();
        assert_eq!(float.exceed_margin_percentage, dec!(10.0));
        assert_eq!(float.status, FloatStatus::Draft);
    }

    #[test]
    fn float_rejects_non_positive_amount() {
        let mut draft = new_float();
        draft.initial_amount = Decimal::ZERO;
        assert!(matches!(
            draft.into_float(),
            Err(PettyCashError::Validation(_))
        ));
    }

    #[test]
    fn float_rejects_amounts_beyond_the_ceiling() {
        let mut draft = new_float();
        draft.initial_amount = dec!(10000000000000000000000000000);
        draft.can_exceed = true;
        draft.exceed_limit = dec!(70000000000000000000000000000);

        match draft.into_float() {
            Err(PettyCashError::Validation(messages)) => assert_eq!(
                messages,
                vec![
                    "Initial float amount cannot exceed 1,000,000,000,000.00.".to_string(),
                    "Exceed limit cannot exceed 1,000,000,000,000.00.".to_string(),
                ]
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn iou_due_date_uses_configured_days() {
        let request_date = Utc::now();
        let request = NewCashRequest {
            kind: RequestKind::Iou,
            float_id: Uuid::new_v4(),
            requested_by: "kasun".to_string(),
            department: "Administration".to_string(),
            request_date: Some(request_date),
            amount: dec!(1000),
            category: ExpenseCategory::Transport,
            reason_in_advance: Some("site visit".to_string()),
            remarks: None,
            request_voucher_ref: None,
        }
        .into_request(&PettyCashConfig::default())
        .unwrap();

        assert_eq!(request.due_date - request.request_date, Duration::days(10));
    }

    #[test]
    fn iou_requires_reason_in_advance() {
        let err = NewCashRequest {
            kind: RequestKind::Iou,
            float_id: Uuid::new_v4(),
            requested_by: "kasun".to_string(),
            department: "Administration".to_string(),
            request_date: None,
            amount: dec!(-5),
            category: ExpenseCategory::Food,
            reason_in_advance: None,
            remarks: None,
            request_voucher_ref: None,
        }
        .into_request(&PettyCashConfig::default())
        .unwrap_err();

        match err {
            PettyCashError::Validation(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn changes_need_at_least_one_modification() {
        assert!(FloatChanges::default().validate().is_err());
        let changes = FloatChanges {
            exceed: Some(ExceedChange {
                can_exceed: true,
                limit: Decimal::ZERO,
            }),
            ..FloatChanges::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn changes_beyond_the_ceiling_are_refused() {
        let changes = FloatChanges {
            new_float_amount: Some(dec!(10000000000000000000000000000)),
            ..FloatChanges::default()
        };
        assert!(matches!(changes.validate(), Err(PettyCashError::Validation(_))));
    }

    #[test]
    fn applying_changes_logs_each_setting() {
        let mut float = new_float().into_float().unwrap();
        let changes = FloatChanges {
            new_float_amount: Some(dec!(20000)),
            new_float_manager: Some("sunil".to_string()),
            ..FloatChanges::default()
        };

        let log = changes.apply_to(&mut float);
        assert_eq!(float.initial_amount, dec!(20000));
        assert_eq!(float.float_manager, "sunil");
        assert_eq!(
            log,
            vec![
                "Float amount: 15000 → 20000".to_string(),
                "Float manager: nimal → sunil".to_string(),
            ]
        );
    }
}
