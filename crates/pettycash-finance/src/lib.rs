use pettycash_core::money::ensure_matches;
use pettycash_core::{
    CashReimbursement, CashRequest, Float, PettyCashError, ReimbursementStatus, RequestKind,
    RequestStatus, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Figures derived from a float's requests and reimbursements; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatBalances {
    pub float_id: Uuid,
    pub initial_amount: Decimal,
    pub current_balance: Decimal,
    pub iou_exposure: Decimal,
    pub cash_in_hand: Decimal,
    pub outstanding_claims: Decimal,
    pub total_petty_cash_requests: usize,
    pub total_iou_requests: usize,
}

pub fn compute_balances<'a>(
    float: &Float,
    requests: impl IntoIterator<Item = &'a CashRequest>,
    reimbursements: impl IntoIterator<Item = &'a CashReimbursement>,
) -> FloatBalances {
    let mut spent = Decimal::ZERO;
    let mut iou_exposure = Decimal::ZERO;
    let mut total_petty_cash_requests = 0;
    let mut total_iou_requests = 0;

    for request in requests.into_iter().filter(|r| r.float_id == float.id) {
        match request.kind {
            RequestKind::PettyCash => {
                total_petty_cash_requests += 1;
                if request.status.is_disbursed() {
                    spent += request.amount;
                }
            }
            RequestKind::Iou => {
                total_iou_requests += 1;
                match request.status {
                    RequestStatus::PendingBillSubmission => iou_exposure += request.amount,
                    RequestStatus::Completed => spent += request.settlement_amount(),
                    _ => {}
                }
            }
        }
    }

    let replenished: Decimal = reimbursements
        .into_iter()
        .filter(|r| r.float_id == float.id && r.status == ReimbursementStatus::Completed)
        .map(CashReimbursement::received_amount)
        .sum();

    let current_balance = float.initial_amount - spent + replenished;

    FloatBalances {
        float_id: float.id,
        initial_amount: float.initial_amount,
        current_balance,
        iou_exposure,
        cash_in_hand: current_balance - iou_exposure,
        outstanding_claims: (float.initial_amount - current_balance).max(Decimal::ZERO),
        total_petty_cash_requests,
        total_iou_requests,
    }
}

/// How far past its cash in hand a float may be asked to pay out.
pub fn exceed_headroom(float: &Float) -> Result<Decimal> {
    if !float.can_exceed {
        Ok(Decimal::ZERO)
    } else if float.exceed_limit > Decimal::ZERO {
        Ok(float.exceed_limit)
    } else {
        float
            .initial_amount
            .checked_mul(float.exceed_margin_percentage)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .map(|headroom| headroom.round_dp(2))
            .ok_or_else(|| out_of_range(float))
    }
}

pub fn ensure_within_float(float: &Float, balances: &FloatBalances, amount: Decimal) -> Result<()> {
    let ceiling = balances
        .cash_in_hand
        .checked_add(exceed_headroom(float)?)
        .ok_or_else(|| out_of_range(float))?;
    if amount > ceiling {
        return Err(PettyCashError::invalid(format!(
            "Request amount ({amount}) exceeds what float \"{}\" can pay out ({ceiling}).",
            float.name
        )));
    }
    Ok(())
}

fn out_of_range(float: &Float) -> PettyCashError {
    PettyCashError::invalid(format!(
        "Float \"{}\" amounts are too large to compute its payout limit.",
        float.name
    ))
}

/// Approved bills must account for the whole claimed amount.
pub fn ensure_settled(request: &CashRequest) -> Result<()> {
    ensure_matches(
        "Settlement amount",
        request.amount,
        request.settlement_amount(),
    )
}
