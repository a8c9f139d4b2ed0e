//! Repositorios
//!
//! Implementaciones del contrato de persistencia: PostgreSQL (sqlx) y un
//! almacén en memoria con la misma semántica transaccional.

pub mod location_repository;
pub mod memory_store;
pub mod store;
pub mod vehicle_repository;

pub use memory_store::MemoryVehicleStore;
pub use store::{complete_transaction, StoreTransaction, VehicleStore};
pub use vehicle_repository::PgVehicleStore;
