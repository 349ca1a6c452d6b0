//! Event endpoints

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use isocal_core::search::next_occurrence;
use isocal_core::{Event, ImportResult, RawEvent};

use crate::routes::AppError;
use crate::state::AppState;

/// Multipart field carrying the uploaded CSV file
const CSV_FIELD: &str = "csvFile";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/events",
            get(list_events).post(create_event).delete(delete_all_events),
        )
        .route("/api/events/import", post(import_events))
        .route("/api/events/export", get(export_events))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/events/{id}/next", get(next_event_occurrence))
}

/// Ids that are not UUIDs cannot name a stored event.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::event_not_found())
}

/// Structural decode of a request body; field checks happen in the store.
fn parse_body(body: Value) -> Result<RawEvent, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest {
        error: "Invalid event data".to_string(),
        details: Some(Value::String(e.to_string())),
    })
}

/// GET /api/events - List all events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.store.list()?))
}

/// GET /api/events/{id}
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let id = parse_id(&id)?;
    let event = state.store.get(id)?.ok_or_else(AppError::event_not_found)?;
    Ok(Json(event))
}

/// POST /api/events - Create an event under a fresh id
async fn create_event(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = state.store.create(parse_body(body)?)?;
    tracing::info!(id = %event.id(), title = event.title(), "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/{id} - Replace an event; the path id wins over the body's
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Event>, AppError> {
    let id = parse_id(&id)?;
    let event = state.store.update(id, parse_body(body)?)?;
    Ok(Json(event))
}

/// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/events - Remove every event
async fn delete_all_events(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.delete_all()?;
    tracing::info!("All events deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/events/import - Upsert events from an uploaded CSV file
async fn import_events(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResult>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(CSV_FIELD) {
            upload = Some(field.bytes().await?);
            break;
        }
    }

    let bytes = upload.ok_or_else(|| AppError::bad_request("No file uploaded"))?;
    let content =
        String::from_utf8(bytes.to_vec()).map_err(|_| AppError::bad_request("CSV file must be UTF-8"))?;

    if content.trim().is_empty() {
        return Err(AppError::bad_request("Empty CSV file"));
    }

    let result = state.store.import_csv(&content)?;
    tracing::info!(
        created = result.success,
        updated = result.updated,
        failed = result.errors.len(),
        "CSV imported"
    );
    Ok(Json(result))
}

/// GET /api/events/export - All events as CSV
async fn export_events(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = state.store.export_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"events.csv\""),
        ],
        csv,
    ))
}

#[derive(Deserialize)]
struct NextQuery {
    from: Option<NaiveDate>,
}

#[derive(Serialize)]
struct NextOccurrence {
    date: Option<NaiveDate>,
}

/// GET /api/events/{id}/next?from=YYYY-MM-DD - Next day the event occurs on
async fn next_event_occurrence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NextQuery>,
) -> Result<Json<NextOccurrence>, AppError> {
    let id = parse_id(&id)?;
    let event = state.store.get(id)?.ok_or_else(AppError::event_not_found)?;
    let from = query.from.unwrap_or_else(|| Local::now().date_naive());

    Ok(Json(NextOccurrence {
        date: next_occurrence(&event, from),
    }))
}
