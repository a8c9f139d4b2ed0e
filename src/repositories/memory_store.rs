//! Almacén en memoria
//!
//! Misma semántica que el almacén PostgreSQL: una transacción retiene el
//! candado del estado completo hasta su commit o rollback, y sus escrituras
//! quedan en staging hasta el commit. Lo usan los tests y el modo
//! `STORE_BACKEND=memory`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

use super::store::{StoreTransaction, VehicleStore};
use crate::models::{LocationRecord, Vehicle};
use crate::utils::errors::{internal_error, not_found_error, AppResult};

#[derive(Debug, Default)]
struct MemoryState {
    vehicles: HashMap<Uuid, Vehicle>,
    // Orden de inserción por vehículo
    locations: HashMap<Uuid, Vec<LocationRecord>>,
}

impl MemoryState {
    fn location_count(&self) -> usize {
        self.locations.values().map(Vec::len).sum()
    }
}

#[derive(Clone, Default)]
pub struct MemoryVehicleStore {
    state: Arc<Mutex<MemoryState>>,
    transactions_started: Arc<AtomicUsize>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de transacciones abiertas desde la creación del almacén
    pub fn transactions_started(&self) -> usize {
        self.transactions_started.load(Ordering::SeqCst)
    }

    /// Hacer que el próximo commit falle, simulando una caída de la base de datos
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Total de registros en el ledger, todos los vehículos
    pub async fn ledger_len(&self) -> usize {
        self.state.lock().await.location_count()
    }
}

#[async_trait]
impl VehicleStore for MemoryVehicleStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        self.transactions_started.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryTransaction {
            guard,
            staged_vehicles: Vec::new(),
            deleted: Vec::new(),
            staged_locations: Vec::new(),
            fail_commit: self.fail_next_commit.clone(),
        }))
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.state.lock().await.vehicles.get(&id).cloned())
    }

    async fn list_vehicles(&self, limit: i64) -> AppResult<Vec<Vehicle>> {
        let state = self.state.lock().await;
        let mut vehicles: Vec<Vehicle> = state.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        vehicles.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(vehicles)
    }

    async fn location_history(&self, vehicle_id: Uuid) -> AppResult<Vec<LocationRecord>> {
        let state = self.state.lock().await;
        let mut history = state.locations.get(&vehicle_id).cloned().unwrap_or_default();
        // sort estable: a igual timestamp, el último insertado queda primero
        history.reverse();
        history.sort_by(|a, b| b.ts.cmp(&a.ts));
        Ok(history)
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged_vehicles: Vec<Vehicle>,
    deleted: Vec<Uuid>,
    staged_locations: Vec<LocationRecord>,
    fail_commit: Arc<AtomicBool>,
}

impl MemoryTransaction {
    fn visible_vehicle(&self, id: Uuid) -> Option<Vehicle> {
        if self.deleted.contains(&id) {
            return None;
        }
        self.staged_vehicles
            .iter()
            .rev()
            .find(|v| v.id == id)
            .or_else(|| self.guard.vehicles.get(&id))
            .cloned()
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn find_vehicle_for_update(&mut self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.visible_vehicle(id))
    }

    async fn find_most_recent_location(
        &mut self,
        vehicle_id: Uuid,
    ) -> AppResult<Option<LocationRecord>> {
        let committed = self.guard.locations.get(&vehicle_id).into_iter().flatten();
        let staged = self.staged_locations.iter().filter(|r| r.vehicle_id == vehicle_id);

        // max_by_key devuelve el último máximo: a igual timestamp gana el más reciente
        Ok(committed.chain(staged).max_by_key(|r| r.ts).cloned())
    }

    async fn append_location(&mut self, record: &LocationRecord) -> AppResult<()> {
        if self.visible_vehicle(record.vehicle_id).is_none() {
            return Err(not_found_error("Vehicle", &record.vehicle_id.to_string()));
        }
        self.staged_locations.push(record.clone());
        Ok(())
    }

    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        if self.visible_vehicle(vehicle.id).is_some() {
            return Err(internal_error("duplicate vehicle id"));
        }
        self.deleted.retain(|id| *id != vehicle.id);
        self.staged_vehicles.push(vehicle.clone());
        Ok(())
    }

    async fn save_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        if self.visible_vehicle(vehicle.id).is_none() {
            return Err(not_found_error("Vehicle", &vehicle.id.to_string()));
        }
        self.staged_vehicles.push(vehicle.clone());
        Ok(())
    }

    async fn delete_vehicle(&mut self, id: Uuid) -> AppResult<()> {
        if self.visible_vehicle(id).is_none() {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        self.staged_vehicles.retain(|v| v.id != id);
        self.staged_locations.retain(|r| r.vehicle_id != id);
        self.deleted.push(id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            warn!("⚠️ Commit simulado como fallido, descartando escrituras");
            return Err(internal_error("simulated commit failure"));
        }

        let MemoryTransaction {
            mut guard,
            staged_vehicles,
            deleted,
            staged_locations,
            ..
        } = *self;

        for id in &deleted {
            guard.vehicles.remove(id);
            guard.locations.remove(id);
        }
        for vehicle in staged_vehicles {
            guard.vehicles.insert(vehicle.id, vehicle);
        }
        for record in staged_locations {
            guard.locations.entry(record.vehicle_id).or_default().push(record);
        }

        debug!("💾 Commit en memoria: {} registros en el ledger", guard.location_count());
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        debug!(
            "↩️ Rollback en memoria: {} escrituras descartadas",
            self.staged_vehicles.len() + self.staged_locations.len() + self.deleted.len()
        );
        Ok(())
    }
}
