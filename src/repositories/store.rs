//! Contrato de persistencia
//!
//! El ciclo de vida de vehículos sólo habla con estos traits. Toda lectura
//! seguida de escritura pasa por una `StoreTransaction`: o se confirman todas
//! sus operaciones o no se confirma ninguna.

use async_trait::async_trait;
use tracing::error;
use uuid::Uuid;

use crate::models::{LocationRecord, Vehicle};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Abrir una unidad de trabajo atómica
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn list_vehicles(&self, limit: i64) -> AppResult<Vec<Vehicle>>;

    /// Historial completo de un vehículo, del más reciente al más antiguo
    async fn location_history(&self, vehicle_id: Uuid) -> AppResult<Vec<LocationRecord>>;
}

/// Handle transaccional. Si se descarta sin `commit`, todo se revierte.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Leer el vehículo bloqueando su fila hasta el final de la transacción
    async fn find_vehicle_for_update(&mut self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn find_most_recent_location(
        &mut self,
        vehicle_id: Uuid,
    ) -> AppResult<Option<LocationRecord>>;

    async fn append_location(&mut self, record: &LocationRecord) -> AppResult<()>;

    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()>;

    async fn save_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()>;

    async fn delete_vehicle(&mut self, id: Uuid) -> AppResult<()>;

    async fn commit(self: Box<Self>) -> AppResult<()>;

    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Cerrar una unidad de trabajo según su resultado: commit si fue `Ok`,
/// rollback completo si fue `Err`. El error original siempre se propaga.
pub async fn complete_transaction<T>(
    tx: Box<dyn StoreTransaction>,
    outcome: AppResult<T>,
) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!("❌ Rollback falló tras '{}': {}", e, rollback_err);
            }
            Err(e)
        }
    }
}
