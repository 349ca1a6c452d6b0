//! Month grid endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use isocal_core::grid::{IsoMonthView, NormalMonthView};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calendar/iso/{year}/{month}", get(iso_month))
        .route("/api/calendar/normal/{year}/{month}", get(normal_month))
}

#[derive(Deserialize)]
struct GridQuery {
    /// Overrides the server's local date when marking today
    today: Option<NaiveDate>,
}

impl GridQuery {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// GET /api/calendar/iso/{year}/{month} - ISO month as rows of ISO weeks
async fn iso_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<GridQuery>,
) -> Result<Json<IsoMonthView>, AppError> {
    let events = state.store.list()?;
    IsoMonthView::build(year, month, &events, query.today())
        .map(Json)
        .ok_or_else(|| AppError::bad_request(format!("Invalid ISO month {year}-{month}")))
}

/// GET /api/calendar/normal/{year}/{month} - Gregorian month in Sunday-first rows
async fn normal_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<GridQuery>,
) -> Result<Json<NormalMonthView>, AppError> {
    let events = state.store.list()?;
    NormalMonthView::build(year, month, &events, query.today())
        .map(Json)
        .ok_or_else(|| AppError::bad_request(format!("Invalid month {year}-{month}")))
}
