use std::fmt::Write;

use pettycash_core::money::format_amount;
use pettycash_core::{Breakdown, CashIssue};
use rust_decimal::Decimal;

/// Every tier with its count, as posted when a float's opening cash is set.
pub fn initial_setup_message(breakdown: &Breakdown) -> String {
    let mut html = String::from(
        "<h4>Initial Denomination Setup:</h4>\n<table class=\"table table-sm\">\n",
    );
    for (tier, count) in breakdown.iter() {
        let kind = if tier.is_coin() { "Coins" } else { "Notes" };
        let _ = writeln!(
            html,
            "<tr><td>{} {kind}:</td><td>{count}</td><td>= Rs. {}</td></tr>",
            tier.label(),
            format_amount(Decimal::from(tier.face_value()) * Decimal::from(count)),
        );
    }
    let _ = writeln!(
        html,
        "<tr><td><strong>Total:</strong></td><td></td><td><strong>Rs. {}</strong></td></tr>",
        format_amount(breakdown.total())
    );
    html.push_str("</table>\n");
    html
}

/// Only the tiers actually handed over, plus any change returned.
pub fn cash_issue_message(issue: &CashIssue) -> String {
    let mut html = String::from(
        "<h4>Cash Issued Details:</h4>\n<table class=\"table table-sm\">\n\
         <thead><tr><th>Denomination</th><th>Quantity</th><th>Amount</th></tr></thead>\n<tbody>\n",
    );
    write_rows(&mut html, &issue.issued);
    let _ = write!(
        html,
        "</tbody>\n<tfoot><tr><th>Total Cash Issued:</th><th></th><th>Rs. {}</th></tr></tfoot>\n</table>\n",
        format_amount(issue.issued.total())
    );

    if !issue.change_returned.is_empty() {
        let _ = writeln!(
            html,
            "<div class=\"alert alert-info\"><strong>Balance Given:</strong> Rs. {}</div>",
            format_amount(issue.change_returned.total())
        );
    }
    html
}

/// Tiers received back into the float on reimbursement.
pub fn restock_message(breakdown: &Breakdown) -> String {
    let mut html = String::from(
        "<h4>Cash Received:</h4>\n<table class=\"table table-sm\">\n<tbody>\n",
    );
    write_rows(&mut html, breakdown);
    let _ = write!(
        html,
        "</tbody>\n<tfoot><tr><th>Total Received:</th><th></th><th>Rs. {}</th></tr></tfoot>\n</table>\n",
        format_amount(breakdown.total())
    );
    html
}

fn write_rows(html: &mut String, breakdown: &Breakdown) {
    for (tier, count) in breakdown.iter().filter(|(_, count)| *count > 0) {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{count}</td><td>Rs. {}</td></tr>",
            tier.label(),
            format_amount(Decimal::from(tier.face_value()) * Decimal::from(count)),
        );
    }
}
