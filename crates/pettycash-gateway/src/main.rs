use std::{net::SocketAddr, sync::Arc};

use anyhow::Result as AnyResult;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use chrono::Utc;
use pettycash_core::{
    BillSettlement, Breakdown, CashReimbursement, CashRequest, Department, EventEnvelope,
    EventStore, Float, FloatCustomization, PettyCashConfig, PettyCashError,
};
use pettycash_platform::{
    ActorRequest, AddBillRequest, BillSelectionRequest, ConfirmReceiptRequest, ConvertRequest,
    ConvertResponse, CreateCashRequest, CreateCustomizationRequest, CreateFloatRequest,
    CreateReimbursementRequest, IssueCashRequest, ManagedFloatsResponse, MoOverviewRequest,
    MoOverviewResponse, PgEventStore, ReceiveCashRequest, RecordFilter, RejectionRequest,
    ReportActionRequest, SaveConfigurationRequest, ServiceConfig, SetDenominationRequest,
    SetRateRequest, StatementQuery, connect_database,
};
use pettycash_reporting::{
    CurrencyConverter, DualCurrencyOverlay, RateTable, ReportAction, dual_currency_report_action,
    render_statement,
};
use pettycash_workflow::{
    Allocation, CashIssueInput, DenominationTally, DepartmentSummary, FloatBalances, FloatDesk,
    FloatOverview,
};
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Clone)]
struct AppState {
    desk: Arc<FloatDesk>,
    rates: Arc<RwLock<RateTable>>,
    company_currency: String,
    secondary_currency: String,
}

impl AppState {
    fn new(desk: FloatDesk, company_currency: &str, secondary_currency: &str) -> Self {
        Self {
            desk: Arc::new(desk),
            rates: Arc::new(RwLock::new(RateTable::new(company_currency))),
            company_currency: company_currency.to_string(),
            secondary_currency: secondary_currency.to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "pettycash_gateway=info,tower_http=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080")?;
    let desk = match &config.database_url {
        Some(database_url) => {
            let pool = connect_database(database_url, config.database_max_connections).await?;
            let store = PgEventStore::new(pool);
            store.ensure_schema().await?;
            info!("audit trail stored in postgres");
            FloatDesk::new(Arc::new(store) as Arc<dyn EventStore>)
        }
        None => {
            info!("DATABASE_URL not set, audit trail kept in memory");
            FloatDesk::in_memory()
        }
    };

    let state = AppState::new(desk, &config.company_currency, &config.secondary_currency);
    let router = app(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("petty cash gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/floats", get(list_floats).post(create_float))
        .route("/floats/{float_id}", get(get_float))
        .route("/floats/{float_id}/balances", get(float_balances))
        .route("/floats/{float_id}/submit", post(submit_float))
        .route("/floats/{float_id}/approve", post(approve_float))
        .route("/floats/{float_id}/reject", post(reject_float))
        .route(
            "/floats/{float_id}/denomination",
            get(get_denomination).post(set_denomination),
        )
        .route(
            "/floats/{float_id}/denomination/suggestion",
            get(suggest_denomination),
        )
        .route("/floats/{float_id}/statement", get(float_statement))
        .route("/audit/{record_id}", get(audit_trail))
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/{request_id}", get(get_request))
        .route("/requests/{request_id}/submit", post(submit_request))
        .route("/requests/{request_id}/hod-approve", post(hod_approve))
        .route("/requests/{request_id}/hod-reject", post(hod_reject))
        .route(
            "/requests/{request_id}/float-manager-approve",
            post(float_manager_approve),
        )
        .route(
            "/requests/{request_id}/float-manager-reject",
            post(float_manager_reject),
        )
        .route("/requests/{request_id}/cancel", post(cancel_request))
        .route("/requests/{request_id}/reset", post(reset_request))
        .route("/requests/{request_id}/cash-suggestion", get(suggest_cash))
        .route("/requests/{request_id}/issue-cash", post(issue_cash))
        .route(
            "/requests/{request_id}/confirm-receipt",
            post(confirm_receipt),
        )
        .route("/requests/{request_id}/complete", post(complete_request))
        .route("/requests/{request_id}/bills", post(add_bill))
        .route("/requests/{request_id}/bills/submit", post(submit_bills))
        .route(
            "/requests/{request_id}/bills/submit-drafts",
            post(submit_draft_bills),
        )
        .route("/requests/{request_id}/bills/approve", post(approve_bills))
        .route("/requests/{request_id}/bills/reject", post(reject_bills))
        .route(
            "/reimbursements",
            get(list_reimbursements).post(create_reimbursement),
        )
        .route("/reimbursements/{reimbursement_id}", get(get_reimbursement))
        .route(
            "/reimbursements/{reimbursement_id}/submit",
            post(submit_reimbursement),
        )
        .route(
            "/reimbursements/{reimbursement_id}/approve",
            post(approve_reimbursement),
        )
        .route(
            "/reimbursements/{reimbursement_id}/reject",
            post(reject_reimbursement),
        )
        .route(
            "/reimbursements/{reimbursement_id}/reset",
            post(reset_reimbursement),
        )
        .route(
            "/reimbursements/{reimbursement_id}/receive-cash",
            post(receive_reimbursement_cash),
        )
        .route(
            "/reimbursements/{reimbursement_id}/complete",
            post(complete_reimbursement),
        )
        .route(
            "/reimbursements/{reimbursement_id}/statement",
            get(reimbursement_statement),
        )
        .route(
            "/customizations",
            get(list_customizations).post(create_customization),
        )
        .route("/customizations/{customization_id}", get(get_customization))
        .route(
            "/customizations/{customization_id}/submit",
            post(submit_customization),
        )
        .route(
            "/customizations/{customization_id}/approve",
            post(approve_customization),
        )
        .route(
            "/customizations/{customization_id}/reject",
            post(reject_customization),
        )
        .route(
            "/customizations/{customization_id}/cancel",
            post(cancel_customization),
        )
        .route(
            "/customizations/{customization_id}/reset",
            post(reset_customization),
        )
        .route(
            "/customizations/{customization_id}/clear",
            post(clear_customization),
        )
        .route(
            "/customizations/{customization_id}/duplicate",
            post(duplicate_customization),
        )
        .route("/settings", get(get_settings).put(save_settings))
        .route("/departments", get(list_departments).post(save_department))
        .route("/departments/managers/{user}", get(managed_floats))
        .route("/currency/rates", post(set_rate))
        .route("/currency/convert", post(convert_amount))
        .route("/reports/mo-overview", post(mo_overview_dual))
        .route("/reports/mo-overview/action", post(mo_overview_action))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

// floats

async fn list_floats(State(state): State<AppState>) -> Json<Vec<FloatOverview>> {
    Json(state.desk.float_overviews().await)
}

async fn create_float(
    State(state): State<AppState>,
    Json(payload): Json<CreateFloatRequest>,
) -> Result<(StatusCode, Json<Float>), (StatusCode, String)> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .create_float(payload.float, &actor)
        .await
        .map(|float| (StatusCode::CREATED, Json(float)))
        .map_err(desk_error)
}

async fn get_float(State(state): State<AppState>, Path(float_id): Path<Uuid>) -> ApiResult<Float> {
    state.desk.float(float_id).await.map(Json).map_err(desk_error)
}

async fn float_balances(
    State(state): State<AppState>,
    Path(float_id): Path<Uuid>,
) -> ApiResult<FloatBalances> {
    state
        .desk
        .float_balances(float_id)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn submit_float(
    State(state): State<AppState>,
    Path(float_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<Float> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .submit_float(float_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn approve_float(
    State(state): State<AppState>,
    Path(float_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<Float> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .approve_float(float_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn reject_float(
    State(state): State<AppState>,
    Path(float_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<Float> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .reject_float(float_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn get_denomination(
    State(state): State<AppState>,
    Path(float_id): Path<Uuid>,
) -> ApiResult<DenominationTally> {
    state
        .desk
        .denomination(float_id)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn set_denomination(
    State(state): State<AppState>,
    Path(float_id): Path<Uuid>,
    Json(payload): Json<SetDenominationRequest>,
) -> ApiResult<DenominationTally> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .set_initial_denomination(float_id, payload.counts, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn suggest_denomination(
    State(state): State<AppState>,
    Path(float_id): Path<Uuid>,
) -> ApiResult<Allocation> {
    state
        .desk
        .suggest_initial_denomination(float_id)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn float_statement(
    State(state): State<AppState>,
    Path(float_id): Path<Uuid>,
    Query(query): Query<StatementQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let statement = state
        .desk
        .statement(float_id, query.from, query.to)
        .await
        .map_err(desk_error)?;
    Ok(Html(render_statement(&statement, Utc::now())))
}

async fn audit_trail(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> ApiResult<Vec<EventEnvelope>> {
    state
        .desk
        .audit_trail(record_id)
        .await
        .map(Json)
        .map_err(desk_error)
}

// cash requests

async fn list_requests(
    State(state): State<AppState>,
    Query(filter): Query<RecordFilter>,
) -> Json<Vec<CashRequest>> {
    Json(state.desk.requests(filter.float_id).await)
}

async fn create_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateCashRequest>,
) -> Result<(StatusCode, Json<CashRequest>), (StatusCode, String)> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .create_request(payload.request, &actor)
        .await
        .map(|request| (StatusCode::CREATED, Json(request)))
        .map_err(desk_error)
}

async fn get_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<CashRequest> {
    state
        .desk
        .request(request_id)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn submit_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .submit_request(request_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn hod_approve(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .hod_approve(request_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn hod_reject(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<RejectionRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .hod_reject(request_id, payload.reason, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn float_manager_approve(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .float_manager_approve(request_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn float_manager_reject(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<RejectionRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .float_manager_reject(request_id, payload.reason, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn cancel_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .cancel_request(request_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn reset_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .reset_request(request_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn suggest_cash(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<Breakdown> {
    state
        .desk
        .suggest_cash_issue(request_id)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn issue_cash(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<IssueCashRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    let input = CashIssueInput {
        issued: payload.issued,
        change_returned: payload.change_returned,
    };
    state
        .desk
        .issue_cash(request_id, input, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn confirm_receipt(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ConfirmReceiptRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .confirm_cash_received(request_id, payload.voucher_ref, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn complete_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .complete_request(request_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

// bills

async fn add_bill(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<AddBillRequest>,
) -> Result<(StatusCode, Json<BillSettlement>), (StatusCode, String)> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .add_bill(request_id, payload.bill, &actor)
        .await
        .map(|bill| (StatusCode::CREATED, Json(bill)))
        .map_err(desk_error)
}

async fn submit_bills(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<BillSelectionRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .submit_bills(request_id, &payload.bill_ids, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn submit_draft_bills(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .submit_all_draft_bills(request_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn approve_bills(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<BillSelectionRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .approve_bills(request_id, &payload.bill_ids, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn reject_bills(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<BillSelectionRequest>,
) -> ApiResult<CashRequest> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .reject_bills(
            request_id,
            &payload.bill_ids,
            payload.reason.as_deref().unwrap_or_default(),
            &actor,
        )
        .await
        .map(Json)
        .map_err(desk_error)
}

// reimbursements

async fn list_reimbursements(
    State(state): State<AppState>,
    Query(filter): Query<RecordFilter>,
) -> Json<Vec<CashReimbursement>> {
    Json(state.desk.reimbursements(filter.float_id).await)
}

async fn create_reimbursement(
    State(state): State<AppState>,
    Json(payload): Json<CreateReimbursementRequest>,
) -> Result<(StatusCode, Json<CashReimbursement>), (StatusCode, String)> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .create_reimbursement(payload.reimbursement, &actor)
        .await
        .map(|reimbursement| (StatusCode::CREATED, Json(reimbursement)))
        .map_err(desk_error)
}

async fn get_reimbursement(
    State(state): State<AppState>,
    Path(reimbursement_id): Path<Uuid>,
) -> ApiResult<CashReimbursement> {
    state
        .desk
        .reimbursement(reimbursement_id)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn submit_reimbursement(
    State(state): State<AppState>,
    Path(reimbursement_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashReimbursement> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .submit_reimbursement(reimbursement_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn approve_reimbursement(
    State(state): State<AppState>,
    Path(reimbursement_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashReimbursement> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .approve_reimbursement(reimbursement_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn reject_reimbursement(
    State(state): State<AppState>,
    Path(reimbursement_id): Path<Uuid>,
    Json(payload): Json<RejectionRequest>,
) -> ApiResult<CashReimbursement> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .reject_reimbursement(reimbursement_id, payload.reason, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn reset_reimbursement(
    State(state): State<AppState>,
    Path(reimbursement_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashReimbursement> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .reset_reimbursement(reimbursement_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn receive_reimbursement_cash(
    State(state): State<AppState>,
    Path(reimbursement_id): Path<Uuid>,
    Json(payload): Json<ReceiveCashRequest>,
) -> ApiResult<CashReimbursement> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .receive_reimbursement_cash(reimbursement_id, payload.received, payload.voucher_ref, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn complete_reimbursement(
    State(state): State<AppState>,
    Path(reimbursement_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<CashReimbursement> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .complete_reimbursement(reimbursement_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn reimbursement_statement(
    State(state): State<AppState>,
    Path(reimbursement_id): Path<Uuid>,
) -> Result<Html<String>, (StatusCode, String)> {
    let statement = state
        .desk
        .reimbursement_statement(reimbursement_id)
        .await
        .map_err(desk_error)?;
    Ok(Html(render_statement(&statement, Utc::now())))
}

// customizations

async fn list_customizations(
    State(state): State<AppState>,
    Query(filter): Query<RecordFilter>,
) -> Json<Vec<FloatCustomization>> {
    Json(state.desk.customizations(filter.float_id).await)
}

async fn create_customization(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomizationRequest>,
) -> Result<(StatusCode, Json<FloatCustomization>), (StatusCode, String)> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .create_customization(payload.customization, &actor)
        .await
        .map(|customization| (StatusCode::CREATED, Json(customization)))
        .map_err(desk_error)
}

async fn get_customization(
    State(state): State<AppState>,
    Path(customization_id): Path<Uuid>,
) -> ApiResult<FloatCustomization> {
    state
        .desk
        .customization(customization_id)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn submit_customization(
    State(state): State<AppState>,
    Path(customization_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<FloatCustomization> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .submit_customization(customization_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn approve_customization(
    State(state): State<AppState>,
    Path(customization_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<FloatCustomization> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .approve_customization(customization_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn reject_customization(
    State(state): State<AppState>,
    Path(customization_id): Path<Uuid>,
    Json(payload): Json<RejectionRequest>,
) -> ApiResult<FloatCustomization> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .reject_customization(
            customization_id,
            payload.reason.as_deref().unwrap_or_default(),
            &actor,
        )
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn cancel_customization(
    State(state): State<AppState>,
    Path(customization_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<FloatCustomization> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .cancel_customization(customization_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn reset_customization(
    State(state): State<AppState>,
    Path(customization_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<FloatCustomization> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .reset_customization(customization_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn clear_customization(
    State(state): State<AppState>,
    Path(customization_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<FloatCustomization> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .clear_customization_changes(customization_id, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn duplicate_customization(
    State(state): State<AppState>,
    Path(customization_id): Path<Uuid>,
    Json(payload): Json<ActorRequest>,
) -> Result<(StatusCode, Json<FloatCustomization>), (StatusCode, String)> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .duplicate_customization(customization_id, &actor)
        .await
        .map(|customization| (StatusCode::CREATED, Json(customization)))
        .map_err(desk_error)
}

// settings and dashboard

async fn get_settings(State(state): State<AppState>) -> Json<PettyCashConfig> {
    Json(state.desk.configuration().await)
}

async fn save_settings(
    State(state): State<AppState>,
    Json(payload): Json<SaveConfigurationRequest>,
) -> ApiResult<PettyCashConfig> {
    let actor = validate_actor(&payload.actor).map_err(invalid_request)?;
    state
        .desk
        .save_configuration(payload.config, &actor)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn list_departments(State(state): State<AppState>) -> Json<Vec<DepartmentSummary>> {
    Json(state.desk.departments().await)
}

async fn save_department(
    State(state): State<AppState>,
    Json(payload): Json<Department>,
) -> ApiResult<Department> {
    state
        .desk
        .save_department(payload)
        .await
        .map(Json)
        .map_err(desk_error)
}

async fn managed_floats(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Json<ManagedFloatsResponse> {
    let managed_float_count = state.desk.managed_float_count(&user).await;
    Json(ManagedFloatsResponse {
        user,
        managed_float_count,
    })
}

// currency and cost report

async fn set_rate(
    State(state): State<AppState>,
    Json(payload): Json<SetRateRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let currency = normalize_currency(&payload.currency).map_err(invalid_request)?;
    state
        .rates
        .write()
        .await
        .set_rate(&currency, payload.date, payload.rate)
        .map_err(desk_error)?;
    info!(%currency, date = %payload.date, rate = %payload.rate, "exchange rate stored");
    Ok(StatusCode::NO_CONTENT)
}

async fn convert_amount(
    State(state): State<AppState>,
    Json(payload): Json<ConvertRequest>,
) -> ApiResult<ConvertResponse> {
    let from = normalize_currency(&payload.from).map_err(invalid_request)?;
    let to = normalize_currency(&payload.to).map_err(invalid_request)?;
    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());

    let converted = state
        .rates
        .read()
        .await
        .convert(payload.amount, &from, &to, date)
        .map_err(desk_error)?;

    Ok(Json(ConvertResponse {
        amount: payload.amount,
        from,
        to,
        date,
        converted: converted.round_dp(2),
    }))
}

async fn mo_overview_dual(
    State(state): State<AppState>,
    Json(payload): Json<MoOverviewRequest>,
) -> ApiResult<MoOverviewResponse> {
    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());
    let mut docs = payload.docs;

    let rates = state.rates.read().await;
    DualCurrencyOverlay::new(
        &*rates,
        &state.company_currency,
        &state.secondary_currency,
        date,
    )
    .apply_all(&mut docs)
    .map_err(desk_error)?;

    Ok(Json(MoOverviewResponse {
        company_currency: state.company_currency.clone(),
        secondary_currency: state.secondary_currency.clone(),
        date,
        docs,
    }))
}

async fn mo_overview_action(
    State(state): State<AppState>,
    Json(payload): Json<ReportActionRequest>,
) -> ApiResult<ReportAction> {
    if payload.order_ids.is_empty() {
        return Err(invalid_request(anyhow::anyhow!(
            "select at least one manufacturing order"
        )));
    }
    Ok(Json(dual_currency_report_action(
        &payload.order_ids,
        &state.company_currency,
        &state.secondary_currency,
    )))
}

fn validate_actor(actor: &str) -> AnyResult<String> {
    let normalized = actor.trim().to_string();
    if normalized.is_empty() {
        anyhow::bail!("actor is required");
    }
    Ok(normalized)
}

fn normalize_currency(value: &str) -> AnyResult<String> {
    let normalized = value.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        anyhow::bail!("currency is required");
    }
    if normalized.len() != 3 {
        anyhow::bail!("currency must be a 3-letter code");
    }
    Ok(normalized)
}

fn desk_error(err: PettyCashError) -> (StatusCode, String) {
    match err {
        PettyCashError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        PettyCashError::Storage(_) => {
            error!("audit store failure: {err}");
            internal_error(err)
        }
        _ => (StatusCode::BAD_REQUEST, err.to_string()),
    }
}

fn invalid_request(err: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn internal_error<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
