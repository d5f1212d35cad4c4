use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::calendar::{build_calendar, CalendarDay};

#[derive(Debug, Serialize)]
pub(crate) struct CalendarResponse {
    pub(crate) calendar: Vec<CalendarDay>,
}

/// Weekly class grid, rebuilt from the current activities on every call.
pub(crate) async fn calendar_handler(
    State(state): State<AppState>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let calendar = build_calendar(state.activities.as_ref())?;
    debug!(
        "Calendar: {} slots",
        calendar.iter().map(|d| d.activities.len()).sum::<usize>()
    );
    Ok(Json(CalendarResponse { calendar }))
}
