use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppResult, InternalContext};
use crate::models::{StatusCheck, StatusCheckCreate};
use crate::repo::StatusCheckRepo;
use crate::state::AppState;

/// Liveness records, unrelated to the tracked data.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/status", get(list_status_checks).post(create_status_check))
        .with_state(state)
}

async fn create_status_check(
    State(state): State<AppState>,
    payload: Result<Json<StatusCheckCreate>, JsonRejection>,
) -> AppResult<Json<StatusCheck>> {
    let Json(input) = payload?;
    let check = StatusCheck::from(input);

    StatusCheckRepo::insert(state.store(), &check)
        .await
        .internal("Failed to record status check")?;

    Ok(Json(check))
}

async fn list_status_checks(State(state): State<AppState>) -> AppResult<Json<Vec<StatusCheck>>> {
    let checks = StatusCheckRepo::list(state.store())
        .await
        .internal("Failed to fetch status checks")?;

    Ok(Json(checks))
}
