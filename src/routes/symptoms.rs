use axum::{
    Router,
    routing::get,
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::error::{AppError, AppResult, InternalContext};
use crate::models::{MessageResponse, Symptom, SymptomCreate};
use crate::repo::SymptomRepo;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/symptoms", get(list_symptoms).post(log_symptom))
        .route("/symptoms/:id", get(get_symptom).delete(delete_symptom))
        .with_state(state)
}

async fn log_symptom(
    State(state): State<AppState>,
    payload: Result<Json<SymptomCreate>, JsonRejection>,
) -> AppResult<Json<Symptom>> {
    let Json(input) = payload?;
    let symptom = Symptom::from(input);

    SymptomRepo::insert(state.store(), &symptom)
        .await
        .internal("Failed to create symptom")?;

    tracing::info!(symptom_id = %symptom.id, tags = symptom.symptoms.len(), "Logged symptom");
    Ok(Json(symptom))
}

async fn list_symptoms(State(state): State<AppState>) -> AppResult<Json<Vec<Symptom>>> {
    let symptoms = SymptomRepo::list(state.store())
        .await
        .internal("Failed to fetch symptoms")?;

    Ok(Json(symptoms))
}

async fn get_symptom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Symptom>> {
    SymptomRepo::find_by_id(state.store(), &id)
        .await
        .internal("Failed to fetch symptom")?
        .map(Json)
        .ok_or(AppError::not_found("Symptom"))
}

async fn delete_symptom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    match SymptomRepo::delete_by_id(state.store(), &id)
        .await
        .internal("Failed to delete symptom")?
    {
        true => Ok(Json(MessageResponse::new("Symptom deleted successfully"))),
        false => Err(AppError::not_found("Symptom")),
    }
}
