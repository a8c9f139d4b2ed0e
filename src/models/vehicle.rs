//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y la máquina de estados de disponibilidad.
//! Mapea exactamente a la tabla `vehicles` con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Disponibilidad del vehículo - mapea al ENUM vehicle_availability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_availability", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    InUse,
}

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub battery: i32,
    pub availability: Availability,
    pub vehicle_type: String,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Nuevo vehículo, siempre disponible y sin historial de posiciones
    pub fn new(battery: i32, vehicle_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            battery,
            availability: Availability::Available,
            vehicle_type: vehicle_type.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_in_use(&self) -> bool {
        self.availability == Availability::InUse
    }

    /// Transición `available -> in_use`
    pub fn begin_ride(&mut self) -> AppResult<()> {
        match self.availability {
            Availability::Available => {
                self.availability = Availability::InUse;
                Ok(())
            }
            Availability::InUse => Err(AppError::Conflict(format!(
                "Vehicle {} is already in use",
                self.id
            ))),
        }
    }

    /// Transición `in_use -> available`, registrando la batería al devolverlo
    pub fn end_ride(&mut self, battery: i32) -> AppResult<()> {
        match self.availability {
            Availability::InUse => {
                self.availability = Availability::Available;
                self.battery = battery;
                Ok(())
            }
            Availability::Available => Err(AppError::Conflict(format!(
                "Vehicle {} is not checked out",
                self.id
            ))),
        }
    }
}
