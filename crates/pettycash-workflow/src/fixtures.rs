use pettycash_core::{
    Breakdown, CashRequest, ExpenseCategory, Float, NewBill, NewCashRequest, NewFloat,
    RequestKind, Tier,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::FloatDesk;

pub const DEPARTMENT: &str = "Administration";

pub fn admin_float(amount: Decimal) -> NewFloat {
    NewFloat {
        name: "Admin Float".to_string(),
        department: DEPARTMENT.to_string(),
        initial_amount: amount,
        can_exceed: false,
        exceed_limit: Decimal::ZERO,
        exceed_margin_percentage: None,
        allow_cross_department: false,
        float_manager: "nimal".to_string(),
        remarks: None,
        attachment_ref: None,
    }
}

/// 1×5000, 7×1000, 4×500, 10×100.
pub fn opening_stock() -> Breakdown {
    Breakdown::new()
        .with(Tier::Note5000, 1)
        .with(Tier::Note1000, 7)
        .with(Tier::Note500, 4)
        .with(Tier::Note100, 10)
}

/// An approved 15,000 float holding [`opening_stock`].
pub async fn approved_float(desk: &FloatDesk) -> Float {
    let float = desk
        .create_float(admin_float(dec!(15000)), "nimal")
        .await
        .unwrap();
    desk.submit_float(float.id, "nimal").await.unwrap();
    desk.set_initial_denomination(float.id, opening_stock(), "nimal")
        .await
        .unwrap();
    desk.approve_float(float.id, "director").await.unwrap()
}

pub fn petty_cash(float: &Float, amount: Decimal) -> NewCashRequest {
    NewCashRequest {
        kind: RequestKind::PettyCash,
        float_id: float.id,
        requested_by: "kasun".to_string(),
        department: DEPARTMENT.to_string(),
        request_date: None,
        amount,
        category: ExpenseCategory::Stationery,
        reason_in_advance: None,
        remarks: None,
        request_voucher_ref: None,
    }
}

pub fn iou(float: &Float, amount: Decimal) -> NewCashRequest {
    NewCashRequest {
        kind: RequestKind::Iou,
        reason_in_advance: Some("Site visit to Kandy".to_string()),
        category: ExpenseCategory::Transport,
        ..petty_cash(float, amount)
    }
}

pub fn bill(amount: Decimal) -> NewBill {
    NewBill {
        date: None,
        category: ExpenseCategory::Taxi,
        amount,
        receipt_ref: Some("receipt.pdf".to_string()),
        description: None,
    }
}

/// Creates the request and takes it through both approvals.
pub async fn approved_request(desk: &FloatDesk, new_request: NewCashRequest) -> CashRequest {
    let request = desk.create_request(new_request, "kasun").await.unwrap();
    desk.submit_request(request.id, "kasun").await.unwrap();
    desk.hod_approve(request.id, "hod").await.unwrap();
    desk.float_manager_approve(request.id, "nimal").await.unwrap()
}

/// Adds one bill for `amount`, submits it and approves it.
pub async fn settle(desk: &FloatDesk, request_id: uuid::Uuid, amount: Decimal) {
    let bill = desk.add_bill(request_id, bill(amount), "kasun").await.unwrap();
    desk.submit_bills(request_id, &[bill.id], "kasun").await.unwrap();
    desk.approve_bills(request_id, &[bill.id], "nimal").await.unwrap();
}
