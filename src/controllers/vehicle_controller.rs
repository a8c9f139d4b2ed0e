use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    CheckInRequest, Confirmation, CreateVehicleRequest, RideSummary, VehicleDetailResponse,
    VehicleStatusResponse,
};
use crate::dto::ApiResponse;
use crate::models::{LocationRecord, Vehicle};
use crate::repositories::{complete_transaction, StoreTransaction, VehicleStore};
use crate::services::clock::Clock;
use crate::services::location_ledger::LocationLedger;
use crate::services::vehicle_lifecycle::VehicleLifecycle;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub const DEFAULT_MAX_VEHICLES: i64 = 20;

pub struct VehicleController {
    store: Arc<dyn VehicleStore>,
    clock: Arc<dyn Clock>,
    lifecycle: VehicleLifecycle,
}

impl VehicleController {
    pub fn new(store: Arc<dyn VehicleStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            lifecycle: VehicleLifecycle::new(store.clone(), clock.clone()),
            store,
            clock,
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;

        let position = match (request.latitude, request.longitude) {
            (Some(latitude), Some(longitude)) => Some((latitude, longitude)),
            (None, None) => None,
            _ => {
                return Err(AppError::BadRequest(
                    "Latitude and longitude must be provided together".to_string(),
                ))
            }
        };

        let vehicle = Vehicle::new(request.battery, request.vehicle_type.trim());
        let first_location =
            position.map(|(lat, lon)| LocationRecord::new(vehicle.id, lat, lon, self.clock.now()));

        let mut tx = self.store.begin().await?;
        let outcome = Self::create_in(tx.as_mut(), &vehicle, first_location.as_ref()).await;
        complete_transaction(tx, outcome).await?;

        info!("✅ Vehículo {} creado ({})", vehicle.id, vehicle.vehicle_type);
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle created".to_string(),
        ))
    }

    async fn create_in(
        tx: &mut dyn StoreTransaction,
        vehicle: &Vehicle,
        first_location: Option<&LocationRecord>,
    ) -> AppResult<()> {
        tx.insert_vehicle(vehicle).await?;
        if let Some(record) = first_location {
            LocationLedger::new(&mut *tx).append(record).await?;
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleDetailResponse> {
        let vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;
        let location_history = self.store.location_history(id).await?;

        Ok(VehicleDetailResponse {
            vehicle,
            location_history,
        })
    }

    pub async fn list(&self, max_vehicles: Option<i64>) -> AppResult<Vec<Vehicle>> {
        let max = max_vehicles.unwrap_or(DEFAULT_MAX_VEHICLES);
        if max < 1 {
            return Err(AppError::BadRequest(
                "max_vehicles must be at least 1".to_string(),
            ));
        }
        self.store.list_vehicles(max).await
    }

    pub async fn status(&self, id: Uuid) -> AppResult<VehicleStatusResponse> {
        let vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        Ok(VehicleStatusResponse {
            id,
            in_use: vehicle.is_in_use(),
        })
    }

    /// Borrar un vehículo y su historial; prohibido mientras esté en uso
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let outcome = Self::delete_in(tx.as_mut(), id).await;
        complete_transaction(tx, outcome).await?;

        info!("🗑️ Vehículo {} eliminado", id);
        Ok(())
    }

    async fn delete_in(tx: &mut dyn StoreTransaction, id: Uuid) -> AppResult<()> {
        let vehicle = tx
            .find_vehicle_for_update(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if vehicle.is_in_use() {
            return Err(AppError::Conflict(format!(
                "Vehicle {} in use and cannot be removed",
                id
            )));
        }
        tx.delete_vehicle(id).await
    }

    pub async fn checkout(&self, id: Uuid) -> AppResult<Confirmation> {
        self.lifecycle.checkout(id).await
    }

    pub async fn check_in(&self, id: Uuid, request: CheckInRequest) -> AppResult<RideSummary> {
        self.lifecycle
            .check_in(id, request.latitude, request.longitude, request.battery)
            .await
    }
}
