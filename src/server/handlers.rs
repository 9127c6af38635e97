//! Request handlers for `/api/v1`

use super::AppState;
use crate::error::{PoyaError, PoyaResult};
use crate::listing::HolidayListing;
use crate::resolver::HolidayPayload;
use crate::service::{CoverageReport, ServiceStatus, VersionInfo};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub year: i32,
    pub month: Option<u32>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "full".to_string()
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

/// Unwrap a query string, reporting malformed or missing fields as a bad parameter
fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> PoyaResult<T> {
    query.map(|Query(value)| value).map_err(|rejection| PoyaError::InvalidParameter {
        name: "query",
        value: rejection.body_text(),
    })
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub date: String,
    pub response: bool,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub date: String,
    pub response: HolidayPayload,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub holidays: HolidayListing,
}

pub async fn check_holiday(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> PoyaResult<Json<CheckResponse>> {
    let query = parse_query(query)?;
    let (date, response) = state
        .service
        .check(query.year, query.month, query.day)
        .await?;
    Ok(Json(CheckResponse { date, response }))
}

pub async fn holiday_info(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> PoyaResult<Json<InfoResponse>> {
    let query = parse_query(query)?;
    let resolution = state
        .service
        .info(query.year, query.month, query.day)
        .await?;
    Ok(Json(InfoResponse {
        date: resolution.date.to_string(),
        response: resolution.payload,
    }))
}

pub async fn holidays(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> PoyaResult<Json<ListResponse>> {
    let query = parse_query(query)?;
    let holidays = state
        .service
        .list(
            query.year,
            query.month,
            query.category.as_deref(),
            &query.format,
        )
        .await?;
    Ok(Json(ListResponse { holidays }))
}

pub async fn coverage(
    State(state): State<AppState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> PoyaResult<Json<CoverageReport>> {
    let query = parse_query(query)?;
    Ok(Json(state.service.coverage(query.year).await?))
}

/// Reachable only through the key middleware
pub async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    let mut status = state.service.status();
    status.api_key_validation = Some("successful");
    Json(status)
}

pub async fn version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(state.service.version())
}
