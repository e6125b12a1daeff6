//! Request handlers
//!
//! Each handler validates its payload through the DTO layer, calls one
//! application service and serializes the result.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use tracing::info;

use super::AppState;
use super::error::ApiError;
use crate::application::dto::{
    CheckDropsRequest, CheckDropsResponse, MonthlyReportQuery, MonthlyReportResponse, PriceQuery,
    PurchaseListQuery, PurchaseListResponse, RegisterPurchasesRequest, RegisterPurchasesResponse,
};
use crate::domain::price_watch::ScrapeResult;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "hint": "use /preco?url=... , POST /verificar_quedas , POST /registrar_compra , \
                 GET /relatorio_mensal?ano=YYYY&mes=MM , GET /compras?mes=MM&ano=YYYY"
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }))
}

/// `GET /preco?url=...`
pub async fn get_price(
    State(state): State<AppState>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> ApiResult<ScrapeResult> {
    let Query(query) = query?;
    let url = query.validated_url()?;
    let result = state.price_monitor.current_price(url).await?;
    Ok(Json(result))
}

/// `POST /verificar_quedas`
pub async fn check_drops(
    State(state): State<AppState>,
    payload: Result<Json<CheckDropsRequest>, JsonRejection>,
) -> ApiResult<CheckDropsResponse> {
    let Json(request) = payload?;
    let items = request.into_items()?;
    let baixas = state.price_monitor.detect_drops(&items).await;
    Ok(Json(CheckDropsResponse { baixas }))
}

/// `POST /registrar_compra`
pub async fn register_purchases(
    State(state): State<AppState>,
    payload: Result<Json<RegisterPurchasesRequest>, JsonRejection>,
) -> ApiResult<RegisterPurchasesResponse> {
    let Json(request) = payload?;
    let purchases = request.into_purchases(Utc::now().date_naive())?;
    let inserted = state.purchases.register(&purchases).await?;
    Ok(Json(RegisterPurchasesResponse::ok(inserted)))
}

/// `GET /relatorio_mensal?ano=YYYY&mes=MM`
pub async fn monthly_report(
    State(state): State<AppState>,
    query: Result<Query<MonthlyReportQuery>, QueryRejection>,
) -> ApiResult<MonthlyReportResponse> {
    let Query(query) = query?;
    let (year, month) = query.validate()?;
    let report = state.purchases.monthly_report(year, month).await?;
    info!(year, month, total = report.total_spent, "Monthly report built");
    Ok(Json(report))
}

/// `GET /compras?mes=MM&ano=YYYY`
pub async fn list_purchases(
    State(state): State<AppState>,
    query: Result<Query<PurchaseListQuery>, QueryRejection>,
) -> ApiResult<PurchaseListResponse> {
    let Query(query) = query?;
    let filter = query.to_filter(Utc::now().date_naive())?;
    let records = state.purchases.list(filter).await?;
    Ok(Json(PurchaseListResponse::from(records)))
}
