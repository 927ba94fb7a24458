//! Description suggestion upsert and scan operations.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{Result, StoreError};
use crate::models::DescriptionRecord;

/// Insert or replace the description record keyed by `record.id`.
pub async fn put_description<'e, E>(executor: E, record: &DescriptionRecord) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO descriptions (id, alarm_name, alarm_description, suggested_description, updated_at)
        VALUES (?, ?, ?, ?, datetime('now'))
        ON CONFLICT(id) DO UPDATE SET
            alarm_name = excluded.alarm_name,
            alarm_description = excluded.alarm_description,
            suggested_description = excluded.suggested_description,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&record.id)
    .bind(&record.alarm_name)
    .bind(&record.alarm_description)
    .bind(&record.suggested_description)
    .execute(executor)
    .await?;

    Ok(())
}

/// Get the description record for one alarm.
pub async fn get_description(pool: &SqlitePool, id: &str) -> Result<DescriptionRecord> {
    sqlx::query_as::<_, DescriptionRecord>(
        r#"
        SELECT id, alarm_name, alarm_description, suggested_description
        FROM descriptions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StoreError::NotFound {
        entity: "Description",
        id: id.to_string(),
    })
}

/// List every stored description record.
pub async fn scan_descriptions(pool: &SqlitePool) -> Result<Vec<DescriptionRecord>> {
    let records = sqlx::query_as::<_, DescriptionRecord>(
        r#"
        SELECT id, alarm_name, alarm_description, suggested_description
        FROM descriptions
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Delete every description record.
pub async fn delete_all_descriptions<'e, E>(executor: E) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM descriptions")
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
