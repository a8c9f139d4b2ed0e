//! Métricas de viaje
//!
//! Funciones puras: distancia haversine, duración y velocidad media entre
//! dos posiciones con timestamp.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::LocationRecord;

/// Radio medio de la Tierra en kilómetros
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RideMetrics {
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// 0.0 cuando la duración es cero
    pub speed_kmh: f64,
}

impl RideMetrics {
    pub fn compute(
        start_latitude: f64,
        start_longitude: f64,
        end_latitude: f64,
        end_longitude: f64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let distance_km = haversine_km(start_latitude, start_longitude, end_latitude, end_longitude);
        let duration_minutes = duration_minutes(start_time, end_time);
        let speed_kmh = if duration_minutes > 0.0 {
            distance_km / (duration_minutes / 60.0)
        } else {
            0.0
        };

        Self {
            distance_km,
            duration_minutes,
            speed_kmh,
        }
    }

    pub fn between(start: &LocationRecord, end: &LocationRecord) -> Self {
        Self::compute(
            start.latitude,
            start.longitude,
            end.latitude,
            end.longitude,
            start.ts,
            end.ts,
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "You traveled {:.3} km in {:.2} minutes, for an average velocity of {:.3} km/h",
            self.distance_km, self.duration_minutes, self.speed_kmh
        )
    }
}

/// Distancia de círculo máximo en kilómetros
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Minutos transcurridos; un reloj que retrocede cuenta como cero
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = (end - start).num_milliseconds();
    (millis.max(0) as f64) / 60_000.0
}
