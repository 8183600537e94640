use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::MaybeUser,
    error::{AppError, AppResult},
    events::{
        dto::{parse_event_date, truthy_string, CreateEventRequest, UpdateEventRequest},
        repo_types::{Event, EventChanges, NewEvent},
    },
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/event", get(list_events).post(create_event))
        .route(
            "/event/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// `createdBy` is filled only when the caller presents a valid token.
#[instrument(skip(state, caller, payload))]
pub async fn create_event(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    ApiJson(payload): ApiJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let title = truthy_string(payload.title.as_ref(), "title")?;
    let date = truthy_string(payload.date.as_ref(), "date")?;
    let (Some(title), Some(date)) = (title, date) else {
        return Err(AppError::validation("Title and date are required"));
    };
    let date = parse_event_date(&date)?;
    let description = truthy_string(payload.description.as_ref(), "description")?;

    let event = state
        .events
        .create(NewEvent {
            title,
            description,
            date,
            created_by: caller.map(|u| u.id),
        })
        .await?;

    info!(event_id = event.id, created_by = ?event.created_by, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

#[instrument(skip(state))]
pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<Event>>> {
    Ok(Json(state.events.list().await?))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Event>> {
    state
        .events
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Event not found"))
}

/// Partial update: only truthy fields replace stored values.
#[instrument(skip(state, payload))]
pub async fn update_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateEventRequest>,
) -> AppResult<Json<Event>> {
    let Some(current) = state.events.find_by_id(id).await? else {
        return Err(AppError::not_found("Event not found"));
    };

    let changes = EventChanges {
        title: truthy_string(payload.title.as_ref(), "title")?,
        description: truthy_string(payload.description.as_ref(), "description")?,
        date: truthy_string(payload.date.as_ref(), "date")?
            .map(|raw| parse_event_date(&raw))
            .transpose()?,
    };
    if changes.is_empty() {
        return Ok(Json(current));
    }

    let event = state
        .events
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    info!(event_id = event.id, "event updated");
    Ok(Json(event))
}

#[instrument(skip(state))]
pub async fn delete_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    if !state.events.delete(id).await? {
        return Err(AppError::not_found("Event not found"));
    }
    info!(event_id = id, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}
