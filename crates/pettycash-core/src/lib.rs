pub mod denomination;
pub mod error;
pub mod events;
pub mod models;
pub mod money;
pub mod status;
pub mod storage;

pub use denomination::{Breakdown, TIER_COUNT, Tier};
pub use error::{PettyCashError, Result, Violations};
pub use events::{DomainEvent, DomainEventKind};
pub use models::{
    Approval, BillSettlement, CashIssue, CashReimbursement, CashRequest, Department,
    ExceedChange, ExpenseCategory, Float, FloatChanges, FloatCustomization, FloatTerms, NewBill,
    NewCashRequest, NewCustomization, NewFloat, NewReimbursement, PettyCashConfig, Priority,
};
pub use status::{
    BillAction, BillStatus, CustomizationAction, CustomizationStatus, FloatAction, FloatStatus,
    ReimbursementAction, ReimbursementStatus, RequestAction, RequestKind, RequestStatus,
    transition,
};
pub use storage::{EventEnvelope, EventStore};
