use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppResult, InternalContext};
use crate::models::{UserPreferences, UserPreferencesUpdate};
use crate::repo::PreferencesRepo;
use crate::state::AppState;
use crate::validation::require_changes;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/preferences", get(get_preferences).put(update_preferences))
        .with_state(state)
}

/// GET /preferences
///
/// Returns the preferences, creating them with defaults on first access.
async fn get_preferences(State(state): State<AppState>) -> AppResult<Json<UserPreferences>> {
    let prefs = PreferencesRepo::get_or_create(state.store())
        .await
        .internal("Failed to fetch preferences")?;

    Ok(Json(prefs))
}

/// PUT /preferences
///
/// Merges the supplied fields. `notifications` may name any subset of the
/// four flags.
async fn update_preferences(
    State(state): State<AppState>,
    payload: Result<Json<UserPreferencesUpdate>, JsonRejection>,
) -> AppResult<Json<UserPreferences>> {
    let Json(update) = payload?;
    require_changes(&update)?;

    let prefs = PreferencesRepo::update(state.store(), &update)
        .await
        .internal("Failed to update preferences")?;

    tracing::info!(theme = %prefs.theme, language = %prefs.language, "Updated preferences");
    Ok(Json(prefs))
}
