use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    CheckInRequest, Confirmation, CreateVehicleRequest, ListVehiclesQuery, RideSummary,
    VehicleDetailResponse, VehicleStatusResponse,
};
use crate::dto::ApiResponse;
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle).get(list_vehicles))
        .route("/:id", get(get_vehicle).delete(delete_vehicle))
        .route("/:id/status", get(vehicle_status))
        .route("/:id/checkout", post(checkout_vehicle))
        .route("/:id/checkin", post(check_in_vehicle))
}

fn controller(state: &AppState) -> VehicleController {
    VehicleController::new(state.store.clone(), state.clock.clone())
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let Json(request) = payload?;
    let response = controller(&state).create(request).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<ListVehiclesQuery>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let vehicles = controller(&state).list(query.max_vehicles).await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleDetailResponse>>, AppError> {
    let detail = controller(&state).get_by_id(id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    controller(&state).delete(id).await?;
    Ok(Json(ApiResponse::message_only(format!(
        "Deleted vehicle with id {} from database.",
        id
    ))))
}

async fn vehicle_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleStatusResponse>>, AppError> {
    let status = controller(&state).status(id).await?;
    Ok(Json(ApiResponse::success(status)))
}

async fn checkout_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Confirmation>>, AppError> {
    let confirmation = controller(&state).checkout(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        confirmation.clone(),
        confirmation.message,
    )))
}

async fn check_in_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CheckInRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RideSummary>>, AppError> {
    let Json(request) = payload?;
    let summary = controller(&state).check_in(id, request).await?;
    let message = summary.messages.join(" ");
    Ok(Json(ApiResponse::success_with_message(summary, message)))
}
