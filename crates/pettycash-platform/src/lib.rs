pub mod config;
pub mod contracts;
pub mod db;
pub mod pg_events;

pub use config::ServiceConfig;
pub use contracts::{
    ActorRequest, AddBillRequest, BillSelectionRequest, ConfirmReceiptRequest, ConvertRequest,
    ConvertResponse, CreateCashRequest, CreateCustomizationRequest, CreateFloatRequest,
    CreateReimbursementRequest, IssueCashRequest, ManagedFloatsResponse, MoOverviewRequest,
    MoOverviewResponse, ReceiveCashRequest, RecordFilter, RejectionRequest, ReportActionRequest,
    SaveConfigurationRequest, SetDenominationRequest, SetRateRequest, StatementQuery,
};
pub use db::connect_database;
pub use pg_events::PgEventStore;
