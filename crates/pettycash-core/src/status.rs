//! Lifecycle of every approvable record, as explicit transition tables.
//!
//! Each status enum exposes `next(action)`; anything outside the table is an
//! invalid transition and is reported through [`transition`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PettyCashError, Result};

/// Looks up `action` in a transition table, failing with a user-facing error.
pub fn transition<S, A>(entity: &'static str, status: S, action: A) -> Result<S>
where
    S: Copy + fmt::Display,
    A: Action<S>,
{
    action.apply(status).ok_or_else(|| PettyCashError::InvalidTransition {
        entity,
        action: action.name(),
        status: status.to_string(),
    })
}

pub trait Action<S>: Copy {
    fn name(self) -> &'static str;
    fn apply(self, status: S) -> Option<S>;
}

macro_rules! status_display {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $text,)+
                })
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FloatStatus {
    #[default]
    Draft,
    Requested,
    Approved,
    Rejected,
}

status_display!(FloatStatus {
    Draft => "draft",
    Requested => "requested",
    Approved => "approved",
    Rejected => "rejected",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatAction {
    Submit,
    Approve,
    Reject,
}

impl Action<FloatStatus> for FloatAction {
    fn name(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    fn apply(self, status: FloatStatus) -> Option<FloatStatus> {
        use FloatStatus::*;
        match (status, self) {
            (Draft, Self::Submit) => Some(Requested),
            (Requested, Self::Approve) => Some(Approved),
            (Requested, Self::Reject) => Some(Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    PettyCash,
    Iou,
}

impl RequestKind {
    pub fn entity_name(self) -> &'static str {
        match self {
            Self::PettyCash => "petty cash request",
            Self::Iou => "IOU request",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// Shared lifecycle of petty cash and IOU requests. `PendingBillSubmission`
/// is only reachable by IOUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Draft,
    Requested,
    HodApproved,
    FloatManagerApproved,
    CashIssued,
    PendingBillSubmission,
    Completed,
    Cancelled,
    Rejected,
}

status_display!(RequestStatus {
    Draft => "draft",
    Requested => "requested",
    HodApproved => "hod_approved",
    FloatManagerApproved => "float_manager_approved",
    CashIssued => "cash_issued",
    PendingBillSubmission => "pending_bill_submission",
    Completed => "completed",
    Cancelled => "cancelled",
    Rejected => "rejected",
});

impl RequestStatus {
    /// Cash has physically left the float for this request.
    pub fn is_disbursed(self) -> bool {
        matches!(
            self,
            Self::CashIssued | Self::PendingBillSubmission | Self::Completed
        )
    }

    /// Still waiting on an approval or on cash issue.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            Self::Requested | Self::HodApproved | Self::FloatManagerApproved
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Submit,
    HodApprove,
    HodReject,
    FloatManagerApprove,
    FloatManagerReject,
    IssueCash(RequestKind),
    Complete(RequestKind),
    Cancel,
    ResetToDraft,
}

impl Action<RequestStatus> for RequestAction {
    fn name(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::HodApprove => "HOD-approve",
            Self::HodReject => "HOD-reject",
            Self::FloatManagerApprove => "float-manager-approve",
            Self::FloatManagerReject => "float-manager-reject",
            Self::IssueCash(_) => "issue cash for",
            Self::Complete(_) => "complete",
            Self::Cancel => "cancel",
            Self::ResetToDraft => "reset",
        }
    }

    fn apply(self, status: RequestStatus) -> Option<RequestStatus> {
        use RequestStatus::*;
        match (status, self) {
            (Draft, Self::Submit) => Some(Requested),
            (Requested, Self::HodApprove) => Some(HodApproved),
            (Requested, Self::HodReject) => Some(Rejected),
            (HodApproved, Self::FloatManagerApprove) => Some(FloatManagerApproved),
            (HodApproved, Self::FloatManagerReject) => Some(Rejected),
            (FloatManagerApproved, Self::IssueCash(RequestKind::PettyCash)) => Some(CashIssued),
            (FloatManagerApproved, Self::IssueCash(RequestKind::Iou)) => {
                Some(PendingBillSubmission)
            }
            (CashIssued, Self::Complete(RequestKind::PettyCash)) => Some(Completed),
            (PendingBillSubmission, Self::Complete(RequestKind::Iou)) => Some(Completed),
            (Draft | Requested, Self::Cancel) => Some(Cancelled),
            (Rejected, Self::ResetToDraft) => Some(Draft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

status_display!(BillStatus {
    Draft => "draft",
    Submitted => "submitted",
    Approved => "approved",
    Rejected => "rejected",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillAction {
    Submit,
    Approve,
    Reject,
}

impl Action<BillStatus> for BillAction {
    fn name(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    fn apply(self, status: BillStatus) -> Option<BillStatus> {
        use BillStatus::*;
        match (status, self) {
            (Draft, Self::Submit) => Some(Submitted),
            (Submitted, Self::Approve) => Some(Approved),
            (Submitted, Self::Reject) => Some(Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReimbursementStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
    Completed,
}

status_display!(ReimbursementStatus {
    Draft => "draft",
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Completed => "completed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReimbursementAction {
    Submit,
    Approve,
    Reject,
    ResetToDraft,
    Complete,
}

impl Action<ReimbursementStatus> for ReimbursementAction {
    fn name(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::ResetToDraft => "reset",
            Self::Complete => "complete",
        }
    }

    fn apply(self, status: ReimbursementStatus) -> Option<ReimbursementStatus> {
        use ReimbursementStatus::*;
        match (status, self) {
            (Draft, Self::Submit) => Some(Pending),
            (Pending, Self::Approve) => Some(Approved),
            (Pending, Self::Reject) => Some(Rejected),
            (Pending, Self::ResetToDraft) => Some(Draft),
            (Approved, Self::Complete) => Some(Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationStatus {
    #[default]
    Draft,
    Requested,
    Approved,
    Rejected,
    Cancelled,
}

status_display!(CustomizationStatus {
    Draft => "draft",
    Requested => "requested",
    Approved => "approved",
    Rejected => "rejected",
    Cancelled => "cancelled",
});

impl CustomizationStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Draft | Self::Requested)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomizationAction {
    Submit,
    Approve,
    Reject,
    Cancel,
    ResetToDraft,
}

impl Action<CustomizationStatus> for CustomizationAction {
    fn name(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::ResetToDraft => "reset",
        }
    }

    fn apply(self, status: CustomizationStatus) -> Option<CustomizationStatus> {
        use CustomizationStatus::*;
        match (status, self) {
            (Draft, Self::Submit) => Some(Requested),
            (Requested, Self::Approve) => Some(Approved),
            (Requested, Self::Reject) => Some(Rejected),
            (Draft | Requested, Self::Cancel) => Some(Cancelled),
            (Rejected, Self::ResetToDraft) => Some(Draft),
            _ => None,
        }
    }
}
