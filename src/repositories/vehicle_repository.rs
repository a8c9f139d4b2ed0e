use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::location_repository;
use super::store::{StoreTransaction, VehicleStore};
use crate::models::{LocationRecord, Vehicle};
use crate::utils::errors::{not_found_error, AppResult};

const SELECT_VEHICLE: &str =
    "SELECT id, battery, availability, vehicle_type, created_at FROM vehicles";

/// Almacén PostgreSQL. La serialización por vehículo se apoya en
/// `SELECT ... FOR UPDATE` sobre la fila de `vehicles`.
#[derive(Clone)]
pub struct PgVehicleStore {
    pool: PgPool,
}

impl PgVehicleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!("{} WHERE id = $1", SELECT_VEHICLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list_vehicles(&self, limit: i64) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "{} ORDER BY created_at DESC LIMIT $1",
            SELECT_VEHICLE
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn location_history(&self, vehicle_id: Uuid) -> AppResult<Vec<LocationRecord>> {
        Ok(location_repository::history(&self.pool, vehicle_id).await?)
    }
}

pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn find_vehicle_for_update(&mut self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "{} WHERE id = $1 FOR UPDATE",
            SELECT_VEHICLE
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(vehicle)
    }

    async fn find_most_recent_location(
        &mut self,
        vehicle_id: Uuid,
    ) -> AppResult<Option<LocationRecord>> {
        Ok(location_repository::most_recent(&mut *self.tx, vehicle_id).await?)
    }

    async fn append_location(&mut self, record: &LocationRecord) -> AppResult<()> {
        location_repository::append(&mut *self.tx, record).await?;
        Ok(())
    }

    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (id, battery, availability, vehicle_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.battery)
        .bind(vehicle.availability)
        .bind(&vehicle.vehicle_type)
        .bind(vehicle.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn save_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET battery = $2, availability = $3, vehicle_type = $4
            WHERE id = $1
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.battery)
        .bind(vehicle.availability)
        .bind(&vehicle.vehicle_type)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Vehicle", &vehicle.id.to_string()));
        }
        Ok(())
    }

    async fn delete_vehicle(&mut self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
