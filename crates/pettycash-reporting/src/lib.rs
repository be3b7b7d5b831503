pub mod currency;
pub mod mo_overview;
pub mod statement;

pub use currency::{CurrencyConverter, RateTable};
pub use mo_overview::{DualCurrencyOverlay, ReportAction, dual_currency_report_action};
pub use statement::render_statement;
