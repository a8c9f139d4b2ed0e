//! Ledger de posiciones
//!
//! Log append-only por vehículo. Nunca actualiza ni borra registros; sólo
//! añade y responde "¿cuál es la última posición conocida?".

use tracing::debug;
use uuid::Uuid;

use crate::models::LocationRecord;
use crate::repositories::StoreTransaction;
use crate::utils::errors::{AppError, AppResult};

pub struct LocationLedger<'a, T: StoreTransaction + ?Sized> {
    tx: &'a mut T,
}

impl<'a, T: StoreTransaction + ?Sized> LocationLedger<'a, T> {
    pub fn new(tx: &'a mut T) -> Self {
        Self { tx }
    }

    pub async fn append(&mut self, record: &LocationRecord) -> AppResult<()> {
        debug!(
            "📍 Nueva posición para {}: ({}, {}) @ {}",
            record.vehicle_id, record.latitude, record.longitude, record.ts
        );
        self.tx.append_location(record).await
    }

    /// Última posición conocida; `NotFound` si el vehículo no tiene historial
    pub async fn most_recent(&mut self, vehicle_id: Uuid) -> AppResult<LocationRecord> {
        self.tx
            .find_most_recent_location(vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle {} has no recorded location", vehicle_id))
            })
    }
}
