pub mod activities;
pub mod calendar;
pub mod error;
pub mod training_plans;
pub mod users;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, patch};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::calendar::ActivityRepository;
use crate::models::Config;
use crate::store::DocumentStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<DocumentStore>,
    /// Where the calendar reads activities from. Usually the store itself.
    pub(crate) activities: Arc<dyn ActivityRepository>,
}

impl AppState {
    pub(crate) fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            activities: Arc::clone(&store) as Arc<dyn ActivityRepository>,
            store,
        }
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/calendar", get(calendar::calendar_handler))
        .route(
            "/api/users",
            get(users::list_users).post(users::create_user),
        )
        .route("/api/users/{id}", axum::routing::delete(users::delete_user))
        .route(
            "/api/users/{id}/profile",
            get(users::get_user).patch(users::update_user),
        )
        .route("/api/users/{id}/setStatus", patch(users::set_user_status))
        .route(
            "/api/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/api/activities/{id}",
            get(activities::get_activity)
                .patch(activities::update_activity)
                .delete(activities::delete_activity),
        )
        .route(
            "/api/trainingPlans",
            get(training_plans::list_training_plans).post(training_plans::create_training_plan),
        )
        .route(
            "/api/trainingPlans/addAffiliate",
            patch(training_plans::add_affiliate),
        )
        .route(
            "/api/trainingPlans/removeAffiliate",
            patch(training_plans::remove_affiliate),
        )
        .route(
            "/api/trainingPlans/{id}",
            get(training_plans::get_user_training_plans)
                .patch(training_plans::update_training_plan)
                .delete(training_plans::delete_training_plan),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, addr: &str) -> Result<()> {
    let store = DocumentStore::from_config(&config.store).context("Failed to open store")?;
    let app = router(AppState::new(Arc::new(store)));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
