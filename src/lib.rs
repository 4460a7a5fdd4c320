use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod models;
pub mod repo;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;

use state::AppState;

/// Any origin, method and header; credentials allowed. Origins are mirrored
/// because a literal `*` cannot be combined with credentials.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// The full application: every route plus the HTTP middleware stack.
pub fn app(state: AppState) -> Router {
    routes::api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors())
}
