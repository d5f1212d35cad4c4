use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::models::{Activity, Role, Weekday};
use crate::store::Collections;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewActivity {
    name: String,
    #[serde(default)]
    description: Option<String>,
    trainer: Uuid,
    #[serde(default)]
    days: Vec<Weekday>,
    #[serde(default)]
    schedule: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivityPatch {
    name: Option<String>,
    description: Option<String>,
    trainer: Option<Uuid>,
    days: Option<Vec<Weekday>>,
    schedule: Option<Vec<String>>,
}

fn activity_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("There is no activity with the id {id}"))
}

fn check_trainer(data: &Collections, id: Uuid) -> Result<(), ApiError> {
    match data.user(id) {
        Some(u) if u.role == Role::Trainer => Ok(()),
        _ => Err(ApiError::bad_request(format!("User {id} is not a trainer"))),
    }
}

/// Hours are kept as written, but must read as a 24-hour `HH:MM` time.
fn check_schedule(schedule: &[String]) -> Result<(), ApiError> {
    for hour in schedule {
        if hour.len() != 5 || NaiveTime::parse_from_str(hour, "%H:%M").is_err() {
            return Err(ApiError::bad_request(format!(
                "Invalid hour '{hour}', expected HH:MM"
            )));
        }
    }
    Ok(())
}

pub(crate) async fn list_activities(State(state): State<AppState>) -> Json<Value> {
    let activities = state.store.read(|data| data.activities.clone());
    Json(json!({ "activities": activities }))
}

pub(crate) async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let activity = state
        .store
        .read(|data| data.activity(id).cloned())
        .ok_or_else(|| activity_not_found(id))?;
    Ok(Json(json!({ "activity": activity })))
}

pub(crate) async fn create_activity(
    State(state): State<AppState>,
    Json(body): Json<NewActivity>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    check_schedule(&body.schedule)?;
    let activity = state.store.update(|data| {
        check_trainer(data, body.trainer)?;
        let activity = Activity {
            id: Uuid::new_v4(),
            name: body.name,
            description: body.description,
            trainer: body.trainer,
            days: body.days,
            schedule: body.schedule,
        };
        data.activities.push(activity.clone());
        Ok::<_, ApiError>(activity)
    })?;
    info!("Activities: created '{}' ({})", activity.name, activity.id);
    Ok((StatusCode::CREATED, Json(json!({ "activity": activity }))))
}

pub(crate) async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ActivityPatch>,
) -> Result<Json<Value>, ApiError> {
    if let Some(schedule) = &patch.schedule {
        check_schedule(schedule)?;
    }
    let activity = state.store.update(|data| {
        if data.activity(id).is_none() {
            return Err(activity_not_found(id));
        }
        if let Some(trainer) = patch.trainer {
            check_trainer(data, trainer)?;
        }
        let activity = data
            .activity_mut(id)
            .ok_or_else(|| activity_not_found(id))?;
        if let Some(name) = patch.name {
            activity.name = name;
        }
        if let Some(description) = patch.description {
            activity.description = Some(description);
        }
        if let Some(trainer) = patch.trainer {
            activity.trainer = trainer;
        }
        if let Some(days) = patch.days {
            activity.days = days;
        }
        if let Some(schedule) = patch.schedule {
            activity.schedule = schedule;
        }
        Ok(activity.clone())
    })?;
    info!("Activities: updated '{}' ({})", activity.name, activity.id);
    Ok(Json(
        json!({ "message": "Activity updated successfully", "activity": activity }),
    ))
}

pub(crate) async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.store.update(|data| {
        if data.activity(id).is_none() {
            return Err(activity_not_found(id));
        }
        data.activities.retain(|a| a.id != id);
        Ok(())
    })?;
    info!("Activities: deleted {}", id);
    Ok(Json(json!({ "message": "Activity deleted successfully" })))
}
