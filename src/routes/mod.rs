//! Rutas HTTP
//!
//! Ensambla el router de Axum a partir de los routers de cada recurso.

pub mod vehicle_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::json;

use crate::state::AppState;

pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/vehicle", vehicle_routes::create_vehicle_router())
        .with_state(state)
}

/// Endpoint de salud: entorno y backend con los que arrancó el servicio
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": state.clock.now().to_rfc3339(),
        "environment": state.config.environment,
        "store_backend": state.config.store_backend.as_str(),
    }))
}
