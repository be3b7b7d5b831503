use std::fmt::Write;

use chrono::{DateTime, Utc};
use pettycash_core::money::format_amount;
use pettycash_core::{CashRequest, DomainEventKind, RequestKind};
use pettycash_workflow::FloatStatement;
use rust_decimal::Decimal;

const STYLE: &str = "body{font-family:Arial,sans-serif;font-size:12px;color:#222;margin:24px}\
h1{font-size:18px;margin-bottom:4px}\
table{border-collapse:collapse;width:100%;margin:12px 0}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{background:#f2f2f2}\
td.num,th.num{text-align:right}\
.muted{color:#777}";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn period(statement: &FloatStatement) -> String {
    match (statement.from, statement.to) {
        (Some(from), Some(to)) => format!("{from} to {to}"),
        (Some(from), None) => format!("from {from}"),
        (None, Some(to)) => format!("up to {to}"),
        (None, None) => "all dates".to_string(),
    }
}

fn kind_label(request: &CashRequest) -> &'static str {
    match request.kind {
        RequestKind::PettyCash => "Petty Cash",
        RequestKind::Iou => "IOU",
    }
}

/// `CashReceiptConfirmed` reads as "Cash receipt confirmed".
fn activity_label(kind: DomainEventKind) -> String {
    let name = format!("{kind:?}");
    let mut label = String::with_capacity(name.len() + 4);
    for (index, letter) in name.chars().enumerate() {
        if index > 0 && letter.is_ascii_uppercase() {
            label.push(' ');
            label.push(letter.to_ascii_lowercase());
        } else {
            label.push(letter);
        }
    }
    label
}

/// Self-contained HTML statement of a float, printable as is.
pub fn render_statement(statement: &FloatStatement, generated_at: DateTime<Utc>) -> String {
    let float = &statement.float;
    let balances = &statement.balances;
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Float Statement - {name}</title>\
         <style>{STYLE}</style></head><body>\n\
         <h1>Float Statement: {name}</h1>\n\
         <p class=\"muted\">{department} &middot; Float manager: {manager} &middot; Period: {period} &middot; Generated {generated}</p>\n",
        name = escape(&float.name),
        department = escape(&float.department),
        manager = escape(&float.float_manager),
        period = period(statement),
        generated = generated_at.format("%Y-%m-%d %H:%M UTC"),
    );

    html.push_str("<table>\n");
    for (label, amount) in [
        ("Initial Amount", float.initial_amount),
        ("Current Balance", balances.current_balance),
        ("IOU Exposure", balances.iou_exposure),
        ("Cash in Hand", balances.cash_in_hand),
        ("Outstanding Claims", balances.outstanding_claims),
    ] {
        let _ = writeln!(
            html,
            "<tr><th>{label}</th><td class=\"num\">Rs. {}</td></tr>",
            format_amount(amount)
        );
    }
    html.push_str("</table>\n");

    if let Some(stock) = &statement.stock {
        html.push_str(
            "<h2>Denominations</h2>\n<table>\n<tr><th>Denomination</th><th class=\"num\">Count</th><th class=\"num\">Amount</th></tr>\n",
        );
        for (tier, count) in stock.iter().filter(|(_, count)| *count > 0) {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td class=\"num\">{count}</td><td class=\"num\">Rs. {}</td></tr>",
                tier.label(),
                format_amount(Decimal::from(tier.face_value()) * Decimal::from(count)),
            );
        }
        let _ = writeln!(
            html,
            "<tr><th colspan=\"2\">Total</th><th class=\"num\">Rs. {}</th></tr>\n</table>",
            format_amount(stock.total())
        );
    }

    html.push_str(
        "<h2>Requests</h2>\n<table>\n<tr><th>Date</th><th>Type</th><th>Requested By</th>\
         <th>Category</th><th>Status</th><th class=\"num\">Amount</th><th class=\"num\">Settled</th></tr>\n",
    );
    if statement.requests.is_empty() {
        html.push_str("<tr><td colspan=\"7\" class=\"muted\">No requests in this period.</td></tr>\n");
    }
    let mut total = Decimal::ZERO;
    for request in &statement.requests {
        total += request.amount;
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td class=\"num\">Rs. {}</td><td class=\"num\">Rs. {}</td></tr>",
            request.request_date.format("%Y-%m-%d"),
            kind_label(request),
            escape(&request.requested_by),
            request.category.label(),
            request.status,
            format_amount(request.amount),
            format_amount(request.settlement_amount()),
        );
    }
    let _ = writeln!(
        html,
        "<tr><th colspan=\"5\">Total Requested</th><th class=\"num\">Rs. {}</th><th></th></tr>\n</table>",
        format_amount(total)
    );

    if !statement.activity.is_empty() {
        html.push_str("<h2>Activity</h2>\n<table>\n<tr><th>When</th><th>By</th><th>Event</th></tr>\n");
        for envelope in &statement.activity {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                envelope.event.occurred_at.format("%Y-%m-%d %H:%M"),
                escape(&envelope.event.actor),
                activity_label(envelope.event.kind),
            );
        }
        html.push_str("</table>\n");
    }

    html.push_str("</body></html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pettycash_core::{ExpenseCategory, NewCashRequest, NewFloat, Tier};
    use pettycash_core::Breakdown;
    use pettycash_workflow::FloatDesk;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn statement_lists_figures_stock_and_requests() {
        let desk = FloatDesk::in_memory();
        let float = desk
            .create_float(
                NewFloat {
                    name: "R&D <Lab>".to_string(),
                    department: "Research".to_string(),
                    initial_amount: dec!(6000),
                    can_exceed: false,
                    exceed_limit: Decimal::ZERO,
                    exceed_margin_percentage: None,
                    allow_cross_department: false,
                    float_manager: "nimal".to_string(),
                    remarks: None,
                    attachment_ref: None,
                },
                "nimal",
            )
            .await
            .unwrap();
        desk.set_initial_denomination(
            float.id,
            Breakdown::new().with(Tier::Note5000, 1).with(Tier::Note1000, 1),
            "nimal",
        )
        .await
        .unwrap();
        desk.create_request(
            NewCashRequest {
                kind: RequestKind::PettyCash,
                float_id: float.id,
                requested_by: "kasun".to_string(),
                department: "Research".to_string(),
                request_date: None,
                amount: dec!(1250),
                category: ExpenseCategory::Food,
                reason_in_advance: None,
                remarks: None,
                request_voucher_ref: None,
            },
            "kasun",
        )
        .await
        .unwrap();

        let statement = desk.statement(float.id, None, None).await.unwrap();
        let html = render_statement(&statement, Utc::now());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Float Statement: R&amp;D &lt;Lab&gt;"));
        assert!(html.contains("<tr><th>Current Balance</th><td class=\"num\">Rs. 6,000.00</td></tr>"));
        assert!(html.contains("<td>Rs. 5,000</td><td class=\"num\">1</td>"));
        assert!(html.contains("<td>Petty Cash</td><td>kasun</td><td>Food</td><td>draft</td>"));
        assert!(html.contains("Total Requested</th><th class=\"num\">Rs. 1,250.00"));
        assert!(html.contains("Period: all dates"));
        assert!(html.contains("<h2>Activity</h2>"));
        assert!(html.contains("<td>nimal</td><td>Denomination initialized</td>"));
        assert!(html.contains("<td>kasun</td><td>Request created</td>"));
    }

    #[test]
    fn activity_labels_split_words() {
        assert_eq!(
            activity_label(DomainEventKind::CashReceiptConfirmed),
            "Cash receipt confirmed"
        );
        assert_eq!(activity_label(DomainEventKind::CashIssued), "Cash issued");
    }
}
