//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema PostgreSQL:
//! la tabla `vehicles` y el ledger `location_history`.

pub mod location;
pub mod vehicle;

pub use location::LocationRecord;
pub use vehicle::{Availability, Vehicle};
