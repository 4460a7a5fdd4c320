use axum::{routing::get, Json, Router};

use crate::models::MessageResponse;
use crate::state::AppState;

pub mod cycles;
pub mod notes;
pub mod preferences;
pub mod status;
pub mod symptoms;

/// Common prefix of every endpoint.
pub const API_PREFIX: &str = "/api";

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}

/// All resource routers, mounted under [`API_PREFIX`].
pub fn api_router(state: AppState) -> Router {
    let resources = Router::new()
        .merge(status::routes(state.clone()))
        .merge(cycles::routes(state.clone()))
        .merge(symptoms::routes(state.clone()))
        .merge(notes::routes(state.clone()))
        .merge(preferences::routes(state));

    Router::new()
        .route(&format!("{API_PREFIX}/"), get(root))
        .nest(API_PREFIX, resources)
}
