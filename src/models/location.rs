//! Modelo de LocationRecord
//!
//! Entrada inmutable del ledger `location_history`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LocationRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub ts: DateTime<Utc>,
}

impl LocationRecord {
    pub fn new(vehicle_id: Uuid, latitude: f64, longitude: f64, ts: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            latitude,
            longitude,
            ts,
        }
    }

    /// Copia de esta posición con un nuevo timestamp
    pub fn restamped(&self, ts: DateTime<Utc>) -> Self {
        Self::new(self.vehicle_id, self.latitude, self.longitude, ts)
    }
}
