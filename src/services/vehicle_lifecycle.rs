//! Ciclo de vida de vehículos
//!
//! Máquina de estados de dos estados (`available` / `in_use`). Cada transición
//! lee el vehículo con bloqueo de fila, lee su última posición, añade una
//! entrada al ledger y guarda el vehículo dentro de una única transacción.
//! Las métricas del viaje se calculan después del commit a partir de los dos
//! registros ya persistidos; nunca hacen fallar la transacción.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CheckInRequest, Confirmation, RideSummary};
use crate::models::LocationRecord;
use crate::repositories::{complete_transaction, StoreTransaction, VehicleStore};
use crate::services::clock::Clock;
use crate::services::location_ledger::LocationLedger;
use crate::services::ride_metrics::RideMetrics;
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct VehicleLifecycle {
    store: Arc<dyn VehicleStore>,
    clock: Arc<dyn Clock>,
}

impl VehicleLifecycle {
    pub fn new(store: Arc<dyn VehicleStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// `available -> in_use`. Requiere al menos una posición registrada: la
    /// nueva entrada del ledger copia esa posición con el timestamp actual.
    pub async fn checkout(&self, vehicle_id: Uuid) -> AppResult<Confirmation> {
        let mut tx = self.store.begin().await?;
        let outcome = Self::checkout_in(tx.as_mut(), self.clock.as_ref(), vehicle_id).await;

        match complete_transaction(tx, outcome).await {
            Ok(start) => {
                info!(
                    "🛴 Vehículo {} en uso desde ({}, {})",
                    vehicle_id, start.latitude, start.longitude
                );
                Ok(Confirmation {
                    message: format!("Vehicle {} checked out.", vehicle_id),
                })
            }
            Err(e) => {
                warn!("⚠️ Checkout rechazado para {}: {}", vehicle_id, e);
                Err(e)
            }
        }
    }

    async fn checkout_in(
        tx: &mut dyn StoreTransaction,
        clock: &dyn Clock,
        vehicle_id: Uuid,
    ) -> AppResult<LocationRecord> {
        let mut vehicle = tx
            .find_vehicle_for_update(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;
        // el timestamp se toma con la fila bloqueada: orden del ledger = orden de commit
        let now = clock.now();

        vehicle.begin_ride()?;

        let mut ledger = LocationLedger::new(&mut *tx);
        let start = ledger.most_recent(vehicle_id).await?.restamped(now);
        ledger.append(&start).await?;

        tx.save_vehicle(&vehicle).await?;
        Ok(start)
    }

    /// `in_use -> available`. Los parámetros se validan antes de tocar el
    /// almacén; todas las restricciones violadas se devuelven juntas.
    pub async fn check_in(
        &self,
        vehicle_id: Uuid,
        latitude: f64,
        longitude: f64,
        battery: i32,
    ) -> AppResult<RideSummary> {
        let request = CheckInRequest {
            latitude,
            longitude,
            battery,
        };
        request.validate()?;

        let mut tx = self.store.begin().await?;
        let outcome =
            Self::check_in_in(tx.as_mut(), self.clock.as_ref(), vehicle_id, &request).await;

        let (start, end) = match complete_transaction(tx, outcome).await {
            Ok(records) => records,
            Err(e) => {
                warn!("⚠️ Check-in rechazado para {}: {}", vehicle_id, e);
                return Err(e);
            }
        };

        let metrics = RideMetrics::between(&start, &end);
        info!(
            "🏁 Viaje terminado en {}: {:.3} km, {:.2} min, {:.3} km/h",
            vehicle_id, metrics.distance_km, metrics.duration_minutes, metrics.speed_kmh
        );

        Ok(RideSummary {
            messages: vec![
                format!("You have completed your ride on vehicle {}.", vehicle_id),
                metrics.summary(),
            ],
            metrics,
        })
    }

    async fn check_in_in(
        tx: &mut dyn StoreTransaction,
        clock: &dyn Clock,
        vehicle_id: Uuid,
        request: &CheckInRequest,
    ) -> AppResult<(LocationRecord, LocationRecord)> {
        let mut vehicle = tx
            .find_vehicle_for_update(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;
        let now = clock.now();

        vehicle.end_ride(request.battery)?;

        let mut ledger = LocationLedger::new(&mut *tx);
        let start = ledger.most_recent(vehicle_id).await?;
        let end = LocationRecord::new(vehicle_id, request.latitude, request.longitude, now);
        ledger.append(&end).await?;

        tx.save_vehicle(&vehicle).await?;
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Vehicle};
    use crate::repositories::MemoryVehicleStore;
    use crate::services::clock::FixedClock;
    use crate::utils::errors::AppError;
    use chrono::{Duration, TimeZone, Utc};

    struct Fixture {
        store: MemoryVehicleStore,
        clock: Arc<FixedClock>,
        lifecycle: VehicleLifecycle,
    }

    fn fixture() -> Fixture {
        let store = MemoryVehicleStore::new();
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
        let lifecycle = VehicleLifecycle::new(Arc::new(store.clone()), clock.clone());
        Fixture {
            store,
            clock,
            lifecycle,
        }
    }

    async fn seed(fx: &Fixture, position: Option<(f64, f64)>) -> Vehicle {
        let vehicle = Vehicle::new(75, "scooter");
        let mut tx = fx.store.begin().await.unwrap();
        tx.insert_vehicle(&vehicle).await.unwrap();
        if let Some((lat, lon)) = position {
            let record = LocationRecord::new(vehicle.id, lat, lon, fx.clock.now() - Duration::hours(1));
            tx.append_location(&record).await.unwrap();
        }
        tx.commit().await.unwrap();
        vehicle
    }

    #[tokio::test]
    async fn test_checkout_then_check_in_computes_metrics() {
        let fx = fixture();
        let vehicle = seed(&fx, Some((37.0, -122.0))).await;

        let confirmation = fx.lifecycle.checkout(vehicle.id).await.unwrap();
        assert!(confirmation.message.contains("checked out"));
        assert!(fx.store.find_vehicle(vehicle.id).await.unwrap().unwrap().is_in_use());

        fx.clock.advance(Duration::minutes(10));
        let summary = fx.lifecycle.check_in(vehicle.id, 37.001, -122.0, 60).await.unwrap();

        assert!((summary.metrics.distance_km - 0.111).abs() < 0.001);
        assert_eq!(summary.metrics.duration_minutes, 10.0);
        assert!((summary.metrics.speed_kmh - 0.667).abs() < 0.001);
        assert_eq!(summary.messages.len(), 2);

        let stored = fx.store.find_vehicle(vehicle.id).await.unwrap().unwrap();
        assert_eq!(stored.availability, Availability::Available);
        assert_eq!(stored.battery, 60);

        let history = fx.store.location_history(vehicle.id).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].latitude, 37.001);
        assert_eq!(history[1].latitude, 37.0);
        assert_eq!(history[1].ts, history[0].ts - Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_checkout_without_history_is_not_found() {
        let fx = fixture();
        let vehicle = seed(&fx, None).await;

        let err = fx.lifecycle.checkout(vehicle.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let stored = fx.store.find_vehicle(vehicle.id).await.unwrap().unwrap();
        assert_eq!(stored, vehicle);
        assert_eq!(fx.store.ledger_len().await, 0);
    }

    #[tokio::test]
    async fn test_checkout_unknown_vehicle() {
        let fx = fixture();
        let err = fx.lifecycle.checkout(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_second_checkout_conflicts() {
        let fx = fixture();
        let vehicle = seed(&fx, Some((10.0, 10.0))).await;

        fx.lifecycle.checkout(vehicle.id).await.unwrap();
        let ledger_before = fx.store.ledger_len().await;

        let err = fx.lifecycle.checkout(vehicle.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(fx.store.ledger_len().await, ledger_before);
    }

    #[tokio::test]
    async fn test_check_in_invalid_latitude_never_touches_store() {
        let fx = fixture();
        let vehicle = seed(&fx, Some((10.0, 10.0))).await;
        let started = fx.store.transactions_started();

        let err = fx.lifecycle.check_in(vehicle.id, 91.0, 0.0, 50).await.unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("latitude"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(fx.store.transactions_started(), started);
    }

    #[tokio::test]
    async fn test_check_in_reports_every_violation() {
        let fx = fixture();
        let err = fx.lifecycle.check_in(Uuid::new_v4(), -91.0, 181.0, -1).await.unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(errors.field_errors().len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_in_on_available_vehicle_conflicts_without_writes() {
        let fx = fixture();
        let vehicle = seed(&fx, Some((10.0, 10.0))).await;

        let err = fx.lifecycle.check_in(vehicle.id, 11.0, 11.0, 5).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = fx.store.find_vehicle(vehicle.id).await.unwrap().unwrap();
        assert_eq!(stored.battery, 75);
        assert_eq!(stored.availability, Availability::Available);
        assert_eq!(fx.store.ledger_len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_state_identical() {
        let fx = fixture();
        let vehicle = seed(&fx, Some((10.0, 10.0))).await;

        fx.store.fail_next_commit();
        let err = fx.lifecycle.checkout(vehicle.id).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(fx.store.ledger_len().await, 1);
        assert_eq!(fx.store.find_vehicle(vehicle.id).await.unwrap().unwrap(), vehicle);

        // el reintento del llamador parte del mismo estado
        fx.lifecycle.checkout(vehicle.id).await.unwrap();
        assert_eq!(fx.store.ledger_len().await, 2);
    }

    #[tokio::test]
    async fn test_zero_length_ride_has_zero_speed() {
        let fx = fixture();
        let vehicle = seed(&fx, Some((10.0, 10.0))).await;

        fx.lifecycle.checkout(vehicle.id).await.unwrap();
        let summary = fx.lifecycle.check_in(vehicle.id, 10.0, 10.0, 75).await.unwrap();

        assert_eq!(summary.metrics.duration_minutes, 0.0);
        assert_eq!(summary.metrics.speed_kmh, 0.0);
        assert_eq!(summary.metrics.distance_km, 0.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_checkout_waiting_on_lock_stamps_after_earlier_commit() {
        let fx = fixture();
        let vehicle = seed(&fx, Some((1.0, 1.0))).await;
        fx.lifecycle.checkout(vehicle.id).await.unwrap();

        // una transacción concurrente retiene el almacén y termina el viaje
        let mut held = fx.store.begin().await.unwrap();
        let waiting = {
            let lifecycle = fx.lifecycle.clone();
            let id = vehicle.id;
            tokio::spawn(async move { lifecycle.checkout(id).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        fx.clock.advance(Duration::minutes(5));
        let mut returned = held.find_vehicle_for_update(vehicle.id).await.unwrap().unwrap();
        returned.end_ride(50).unwrap();
        let check_in_record = LocationRecord::new(vehicle.id, 2.0, 2.0, fx.clock.now());
        held.append_location(&check_in_record).await.unwrap();
        held.save_vehicle(&returned).await.unwrap();
        held.commit().await.unwrap();

        waiting.await.unwrap().unwrap();

        let history = fx.store.location_history(vehicle.id).await.unwrap();
        assert_eq!(history.len(), 4);
        let newest = &history[0];
        assert_ne!(newest.id, check_in_record.id);
        assert_eq!((newest.latitude, newest.longitude), (2.0, 2.0));
        assert!(newest.ts >= check_in_record.ts);

        let mut tx = fx.store.begin().await.unwrap();
        let most_recent = tx.find_most_recent_location(vehicle.id).await.unwrap().unwrap();
        assert_eq!(most_recent.id, newest.id);
        drop(tx);

        assert!(fx.store.find_vehicle(vehicle.id).await.unwrap().unwrap().is_in_use());
    }
}
