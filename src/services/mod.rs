//! Services module
//!
//! Este módulo contiene la lógica de negocio: la máquina de estados de
//! vehículos, el ledger de posiciones y el cálculo de métricas de viaje.

pub mod clock;
pub mod location_ledger;
pub mod ride_metrics;
pub mod vehicle_lifecycle;

pub use clock::{Clock, FixedClock, SystemClock};
pub use location_ledger::LocationLedger;
pub use ride_metrics::RideMetrics;
pub use vehicle_lifecycle::VehicleLifecycle;
