use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{LocationRecord, Vehicle};
use crate::services::ride_metrics::RideMetrics;
use crate::utils::validation::{validate_finite, validate_not_blank};

// Request para crear un vehículo, opcionalmente ya ubicado
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "create_coordinates_are_finite"))]
pub struct CreateVehicleRequest {
    #[validate(range(min = 0, max = 100, message = "Battery (percent) must be between 0 and 100"))]
    pub battery: i32,

    #[validate(custom = "validate_not_blank")]
    pub vehicle_type: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

// Request de fin de viaje: posición final y batería restante
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate)]
#[validate(schema(function = "check_in_coordinates_are_finite"))]
pub struct CheckInRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,

    #[validate(range(min = 0, max = 100, message = "Battery (percent) must be between 0 and 100"))]
    pub battery: i32,
}

fn create_coordinates_are_finite(request: &CreateVehicleRequest) -> Result<(), ValidationError> {
    validate_finite(request.latitude.into_iter().chain(request.longitude))
}

fn check_in_coordinates_are_finite(request: &CheckInRequest) -> Result<(), ValidationError> {
    validate_finite([request.latitude, request.longitude])
}

#[derive(Debug, Deserialize)]
pub struct ListVehiclesQuery {
    pub max_vehicles: Option<i64>,
}

// Vehículo con su historial, del más reciente al más antiguo
#[derive(Debug, Serialize)]
pub struct VehicleDetailResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub location_history: Vec<LocationRecord>,
}

#[derive(Debug, Serialize)]
pub struct VehicleStatusResponse {
    pub id: Uuid,
    pub in_use: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Confirmation {
    pub message: String,
}

// Resumen del viaje devuelto al hacer check-in
#[derive(Debug, Clone, Serialize)]
pub struct RideSummary {
    pub messages: Vec<String>,
    #[serde(flatten)]
    pub metrics: RideMetrics,
}
