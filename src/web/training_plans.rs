use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::models::{Role, TrainingPlan};

const PLAN_NOT_FOUND: &str = "Training plan not found";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewTrainingPlan {
    name: String,
    #[serde(default)]
    description: Option<String>,
    trainer: Uuid,
    #[serde(default)]
    affiliates: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrainingPlanPatch {
    name: Option<String>,
    description: Option<String>,
    trainer: Option<Uuid>,
    affiliates: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateTrainingPlan {
    #[serde(default)]
    training_plan: TrainingPlanPatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AffiliateAssignment {
    training_plan_id: Uuid,
    affiliate_id: Uuid,
}

pub(crate) async fn list_training_plans(State(state): State<AppState>) -> Json<Value> {
    let plans = state.store.read(|data| data.training_plans.clone());
    Json(json!({ "userTrainingPlans": plans }))
}

/// Plans that belong to a user.
///
/// Affiliates get the plans they are enrolled in, or `{}` when there are none.
/// Trainers get the plans they own, possibly `[]`. Admins have no plans and
/// are reported as not found.
pub(crate) async fn get_user_training_plans(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.store.read(|data| -> Result<Json<Value>, ApiError> {
        let user = data
            .user(user_id)
            .filter(|u| u.role != Role::Admin)
            .ok_or_else(|| ApiError::not_found("User not found."))?;

        if user.role == Role::Affiliate {
            let plans: Vec<&TrainingPlan> = data
                .training_plans
                .iter()
                .filter(|p| p.affiliates.contains(&user_id))
                .collect();
            if plans.is_empty() {
                return Ok(Json(json!({})));
            }
            Ok(Json(json!(plans)))
        } else {
            let plans: Vec<&TrainingPlan> = data
                .training_plans
                .iter()
                .filter(|p| p.trainer == user_id)
                .collect();
            Ok(Json(json!(plans)))
        }
    })
}

pub(crate) async fn create_training_plan(
    State(state): State<AppState>,
    Json(body): Json<NewTrainingPlan>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let plan = TrainingPlan {
        id: Uuid::new_v4(),
        name: body.name,
        description: body.description,
        trainer: body.trainer,
        affiliates: body.affiliates,
    };
    state.store.update(|data| {
        data.training_plans.push(plan.clone());
        Ok::<_, ApiError>(())
    })?;
    info!("Training plans: created '{}' ({})", plan.name, plan.id);
    Ok((StatusCode::CREATED, Json(json!({ "trainingPlan": plan }))))
}

pub(crate) async fn update_training_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTrainingPlan>,
) -> Result<Json<Value>, ApiError> {
    let patch = body.training_plan;
    let plan = state.store.update(|data| {
        let plan = data
            .training_plan_mut(id)
            .ok_or_else(|| ApiError::not_found(PLAN_NOT_FOUND))?;
        if let Some(name) = patch.name {
            plan.name = name;
        }
        if let Some(description) = patch.description {
            plan.description = Some(description);
        }
        if let Some(trainer) = patch.trainer {
            plan.trainer = trainer;
        }
        if let Some(affiliates) = patch.affiliates {
            plan.affiliates = affiliates;
        }
        Ok::<_, ApiError>(plan.clone())
    })?;
    info!("Training plans: updated {}", plan.id);
    Ok(Json(json!({
        "message": "Training plan updated successfully",
        "updatedTrainingPlan": plan
    })))
}

pub(crate) async fn add_affiliate(
    State(state): State<AppState>,
    Json(body): Json<AffiliateAssignment>,
) -> Result<Json<TrainingPlan>, ApiError> {
    let plan = state.store.update(|data| {
        let plan = data
            .training_plan_mut(body.training_plan_id)
            .ok_or_else(|| ApiError::not_found(PLAN_NOT_FOUND))?;
        if !plan.affiliates.contains(&body.affiliate_id) {
            plan.affiliates.push(body.affiliate_id);
        }
        Ok::<_, ApiError>(plan.clone())
    })?;
    info!(
        "Training plans: affiliate {} added to {}",
        body.affiliate_id, plan.id
    );
    Ok(Json(plan))
}

pub(crate) async fn remove_affiliate(
    State(state): State<AppState>,
    Json(body): Json<AffiliateAssignment>,
) -> Result<Json<TrainingPlan>, ApiError> {
    let plan = state.store.update(|data| {
        let plan = data
            .training_plan_mut(body.training_plan_id)
            .ok_or_else(|| ApiError::not_found(PLAN_NOT_FOUND))?;
        plan.affiliates.retain(|a| *a != body.affiliate_id);
        Ok::<_, ApiError>(plan.clone())
    })?;
    info!(
        "Training plans: affiliate {} removed from {}",
        body.affiliate_id, plan.id
    );
    Ok(Json(plan))
}

pub(crate) async fn delete_training_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.store.update(|data| {
        if data.training_plan(id).is_none() {
            return Err(ApiError::not_found(PLAN_NOT_FOUND));
        }
        data.training_plans.retain(|p| p.id != id);
        Ok(())
    })?;
    info!("Training plans: deleted {}", id);
    Ok(Json(json!({ "message": "Training plan deleted successfully" })))
}
