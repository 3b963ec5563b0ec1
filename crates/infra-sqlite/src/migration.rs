// Migration Runner

use sqlx::SqlitePool;
use tracing::info;
use unarchive_core::error::{AppError, Result};

/// Ordered schema migrations
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "Initial schema",
    include_str!("../migrations/001_initial_schema.sql"),
)];

/// Bring the schema up to the latest version
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current = schema_version(pool).await?;
    let pending: Vec<_> = MIGRATIONS.iter().filter(|(v, _, _)| *v > current).collect();

    if pending.is_empty() {
        info!(version = current, "Schema up to date");
        return Ok(());
    }

    for (version, name, sql) in pending {
        info!(version, name, "Applying migration");
        apply_migration(pool, sql).await?;
    }

    Ok(())
}

/// 0 for a fresh database
async fn schema_version(pool: &SqlitePool) -> Result<i64> {
    let has_table: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
    )
    .fetch_one(pool)
    .await
    .map_err(migration_error)?;

    if !has_table {
        return Ok(0);
    }

    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .map_err(migration_error)?;
    Ok(version.unwrap_or(0))
}

/// Statements of a migration file, `--` comment lines dropped
fn statements(sql: &str) -> impl Iterator<Item = String> + '_ {
    sql.split(';')
        .map(|chunk| {
            chunk
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|stmt| !stmt.trim().is_empty())
}

/// One migration, all or nothing
async fn apply_migration(pool: &SqlitePool, sql: &str) -> Result<()> {
    let mut tx = pool.begin().await.map_err(migration_error)?;

    for stmt in statements(sql) {
        sqlx::query(&stmt)
            .execute(&mut *tx)
            .await
            .map_err(migration_error)?;
    }

    tx.commit().await.map_err(migration_error)
}

fn migration_error(err: sqlx::Error) -> AppError {
    AppError::Database(format!("Migration failed: {}", err))
}
