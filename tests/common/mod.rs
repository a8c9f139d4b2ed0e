#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use vehicle_rides::config::EnvironmentConfig;
use vehicle_rides::repositories::MemoryVehicleStore;
use vehicle_rides::routes::create_app_router;
use vehicle_rides::services::FixedClock;
use vehicle_rides::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub store: MemoryVehicleStore,
    pub clock: Arc<FixedClock>,
}

pub fn create_test_app() -> TestApp {
    let store = MemoryVehicleStore::new();
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
    let state = AppState::new(Arc::new(store.clone()), clock.clone(), EnvironmentConfig::default());

    TestApp {
        router: create_app_router(state),
        store,
        clock,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Crear un vehículo ubicado en (lat, lon) y devolver su id
    pub async fn create_vehicle_at(&self, latitude: f64, longitude: f64) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/vehicle",
                Some(serde_json::json!({
                    "battery": 90,
                    "vehicle_type": "scooter",
                    "latitude": latitude,
                    "longitude": longitude,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
