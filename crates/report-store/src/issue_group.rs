//! Issue group upsert and scan operations.

use alarm_core::IssueTag;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{Result, StoreError};
use crate::models::{IssueGroupRecord, IssueGroupRow};

/// Insert or replace the issue group keyed by `record.id`.
pub async fn put_issue_group<'e, E>(executor: E, record: &IssueGroupRecord) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let alarm_list = serde_json::to_string(&record.alarm_list)?;

    sqlx::query(
        r#"
        INSERT INTO issue_groups (id, alarm_list, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(id) DO UPDATE SET
            alarm_list = excluded.alarm_list,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(record.id.as_str())
    .bind(alarm_list)
    .execute(executor)
    .await?;

    Ok(())
}

/// Get the issue group for one tag.
pub async fn get_issue_group(pool: &SqlitePool, tag: IssueTag) -> Result<IssueGroupRecord> {
    sqlx::query_as::<_, IssueGroupRow>(
        r#"
        SELECT id, alarm_list
        FROM issue_groups
        WHERE id = ?
        "#,
    )
    .bind(tag.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StoreError::NotFound {
        entity: "IssueGroup",
        id: tag.as_str().to_string(),
    })?
    .try_into()
}

/// List every stored issue group.
pub async fn scan_issue_groups(pool: &SqlitePool) -> Result<Vec<IssueGroupRecord>> {
    let rows = sqlx::query_as::<_, IssueGroupRow>(
        r#"
        SELECT id, alarm_list
        FROM issue_groups
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(IssueGroupRecord::try_from).collect()
}

/// Delete every issue group.
pub async fn delete_all_issue_groups<'e, E>(executor: E) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM issue_groups")
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
