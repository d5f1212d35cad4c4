use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::models::{Role, User, UserStatus};

const USER_NOT_FOUND: &str = "User not found.";
const ADMIN_PROTECTED: &str = "Not allowed to change admin status";

#[derive(Debug, Deserialize)]
pub(crate) struct UserFilter {
    role: Option<Role>,
    status: Option<UserStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewUser {
    name: String,
    surname: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    role: Role,
    #[serde(default)]
    subscription: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserPatch {
    name: Option<String>,
    surname: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    subscription: Option<Uuid>,
}

pub(crate) async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Json<Value> {
    let users: Vec<User> = state.store.read(|data| {
        data.users
            .iter()
            .filter(|u| filter.role.map_or(true, |r| u.role == r))
            .filter(|u| filter.status.map_or(true, |s| u.status == s))
            .cloned()
            .collect()
    });
    Json(json!({ "users": users }))
}

pub(crate) async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .store
        .read(|data| data.user(id).cloned())
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
    Ok(Json(json!({ "user": user })))
}

pub(crate) async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = state.store.update(|data| {
        if data.email_taken(&body.email, None) {
            return Err(ApiError::bad_request("Email already in use"));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: body.name,
            surname: body.surname,
            email: body.email,
            phone: body.phone,
            role: body.role,
            status: UserStatus::Active,
            subscription: body.subscription,
        };
        data.users.push(user.clone());
        Ok(user)
    })?;
    info!("Users: registered {} as {:?}", user.email, user.role);
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

pub(crate) async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<Value>, ApiError> {
    let user = state.store.update(|data| {
        if data.user(id).is_none() {
            return Err(ApiError::not_found(USER_NOT_FOUND));
        }
        if let Some(email) = &patch.email {
            if data.email_taken(email, Some(id)) {
                return Err(ApiError::bad_request("Email already in use"));
            }
        }
        let user = data
            .user_mut(id)
            .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(surname) = patch.surname {
            user.surname = surname;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(phone) = patch.phone {
            user.phone = Some(phone);
        }
        if let Some(subscription) = patch.subscription {
            user.subscription = Some(subscription);
        }
        Ok(user.clone())
    })?;
    info!("Users: updated profile of {}", user.id);
    Ok(Json(
        json!({ "message": "User updated successfully", "user": user }),
    ))
}

/// Flips a user between active and inactive. Admins cannot be toggled.
pub(crate) async fn set_user_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = state.store.update(|data| {
        let user = data
            .user_mut(id)
            .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
        if user.role == Role::Admin {
            return Err(ApiError::bad_request(ADMIN_PROTECTED));
        }
        user.status = user.status.toggled();
        Ok(user.clone())
    })?;
    info!("Users: {} is now {:?}", user.id, user.status);
    Ok(Json(
        json!({ "message": "User status updated successfully", "data": user }),
    ))
}

pub(crate) async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.store.update(|data| {
        let user = data
            .user(id)
            .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
        if user.role == Role::Admin {
            return Err(ApiError::bad_request(ADMIN_PROTECTED));
        }
        data.users.retain(|u| u.id != id);
        Ok(())
    })?;
    info!("Users: deleted {}", id);
    Ok(Json(json!({ "message": "User delete successfully" })))
}
