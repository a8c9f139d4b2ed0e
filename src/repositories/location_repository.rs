use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::LocationRecord;

// `seq` desempata registros con el mismo timestamp: gana el último insertado
const SELECT_LOCATION: &str =
    "SELECT id, vehicle_id, latitude, longitude, ts FROM location_history";

pub async fn append<'e, E>(executor: E, record: &LocationRecord) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO location_history (id, vehicle_id, latitude, longitude, ts)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(record.id)
    .bind(record.vehicle_id)
    .bind(record.latitude)
    .bind(record.longitude)
    .bind(record.ts)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn most_recent<'e, E>(
    executor: E,
    vehicle_id: Uuid,
) -> Result<Option<LocationRecord>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, LocationRecord>(&format!(
        "{} WHERE vehicle_id = $1 ORDER BY ts DESC, seq DESC LIMIT 1",
        SELECT_LOCATION
    ))
    .bind(vehicle_id)
    .fetch_optional(executor)
    .await
}

pub async fn history<'e, E>(executor: E, vehicle_id: Uuid) -> Result<Vec<LocationRecord>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, LocationRecord>(&format!(
        "{} WHERE vehicle_id = $1 ORDER BY ts DESC, seq DESC",
        SELECT_LOCATION
    ))
    .bind(vehicle_id)
    .fetch_all(executor)
    .await
}
