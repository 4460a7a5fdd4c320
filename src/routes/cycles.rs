use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppError, AppResult, InternalContext};
use crate::models::{Cycle, CycleCreate, CycleUpdate, MessageResponse};
use crate::repo::CycleRepo;
use crate::state::AppState;
use crate::validation::require_changes;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycles", get(list_cycles).post(create_cycle))
        .route(
            "/cycles/:id",
            get(get_cycle).put(update_cycle).delete(delete_cycle),
        )
        .with_state(state)
}

async fn create_cycle(
    State(state): State<AppState>,
    payload: Result<Json<CycleCreate>, JsonRejection>,
) -> AppResult<Json<Cycle>> {
    let Json(input) = payload?;
    let cycle = Cycle::from(input);

    CycleRepo::insert(state.store(), &cycle)
        .await
        .internal("Failed to create cycle")?;

    tracing::info!(cycle_id = %cycle.id, "Created cycle");
    Ok(Json(cycle))
}

async fn list_cycles(State(state): State<AppState>) -> AppResult<Json<Vec<Cycle>>> {
    let cycles = CycleRepo::list(state.store())
        .await
        .internal("Failed to fetch cycles")?;

    Ok(Json(cycles))
}

async fn get_cycle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Cycle>> {
    let Some(cycle) = CycleRepo::find_by_id(state.store(), &id)
        .await
        .internal("Failed to fetch cycle")?
    else {
        return Err(AppError::not_found("Cycle"));
    };

    Ok(Json(cycle))
}

async fn update_cycle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CycleUpdate>, JsonRejection>,
) -> AppResult<Json<Cycle>> {
    let Json(update) = payload?;
    require_changes(&update)?;

    let cycle = CycleRepo::update_by_id(state.store(), &id, &update)
        .await
        .internal("Failed to update cycle")?
        .ok_or(AppError::not_found("Cycle"))?;

    tracing::info!(cycle_id = %cycle.id, "Updated cycle");
    Ok(Json(cycle))
}

async fn delete_cycle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = CycleRepo::delete_by_id(state.store(), &id)
        .await
        .internal("Failed to delete cycle")?;

    if !deleted {
        return Err(AppError::not_found("Cycle"));
    }

    tracing::info!(cycle_id = %id, "🗑️ Deleted cycle");
    Ok(Json(MessageResponse::new("Cycle deleted successfully")))
}
