pub mod admin_bills;
pub mod admin_receipts;
pub mod auth;
pub mod bills;
pub mod clients;
pub mod receipts;

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

/// Every API route. Record routes sit behind the bearer-token check.
pub fn create_router(state: &AppState) -> Router<AppState> {
    let records = Router::new()
        .merge(clients::routes())
        .merge(receipts::routes())
        .merge(bills::routes())
        .merge(admin_receipts::routes())
        .merge(admin_bills::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(auth::routes(state))
        .merge(records)
}

/// The complete service: API routes, health check, request tracing and CORS.
pub fn build_app(state: AppState) -> Router {
    create_router(&state)
        .route("/", get(|| async { "Goldsmith Assistant API" }))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
