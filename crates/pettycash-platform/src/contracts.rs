use chrono::NaiveDate;
use pettycash_core::{
    Breakdown, NewBill, NewCashRequest, NewCustomization, NewFloat, NewReimbursement,
    PettyCashConfig,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFloatRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub float: NewFloat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDenominationRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub counts: Breakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCashRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub request: NewCashRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCashRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub issued: Breakdown,
    #[serde(default)]
    pub change_returned: Breakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmReceiptRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub voucher_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBillRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub bill: NewBill,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillSelectionRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub bill_ids: Vec<Uuid>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReimbursementRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub reimbursement: NewReimbursement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveCashRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub received: Breakdown,
    pub voucher_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomizationRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub customization: NewCustomization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConfigurationRequest {
    #[serde(default = "default_actor")]
    pub actor: String,
    pub config: PettyCashConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    pub float_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedFloatsResponse {
    pub user: String,
    pub managed_float_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRateRequest {
    pub currency: String,
    pub date: NaiveDate,
    pub rate: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub converted: Decimal,
}

/// Cost overview documents to overlay, as produced by the costing report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoOverviewRequest {
    pub date: Option<NaiveDate>,
    pub docs: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoOverviewResponse {
    pub company_currency: String,
    pub secondary_currency: String,
    pub date: NaiveDate,
    pub docs: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportActionRequest {
    pub order_ids: Vec<u64>,
}

fn default_actor() -> String {
    "system".to_string()
}
