//! Schema definitions and migration utilities.
//!
//! The schema SQL is embedded in the binary so a deployment needs no
//! migration files on disk.

use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};

/// Embedded migration SQL for the core schema (001_schema.sql).
pub const SCHEMA_MIGRATION: &str = include_str!("../../../migrations/001_schema.sql");

/// Run all pending migrations against the database.
///
/// This function is idempotent - it can be run multiple times safely.
/// Migrations check for existing objects before creating them.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    sqlx::raw_sql(SCHEMA_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::Migration(format!("Schema migration failed: {e}")))?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Check if the schema has been initialized.
///
/// Returns true if the `books` table exists.
pub async fn is_schema_initialized(pool: &PgPool) -> StoreResult<bool> {
    let result: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = 'books'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(result.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_migration_embedded() {
        // Verify the migration SQL is properly embedded
        assert!(SCHEMA_MIGRATION.contains("CREATE TABLE IF NOT EXISTS books"));
        assert!(SCHEMA_MIGRATION.contains("CREATE TABLE IF NOT EXISTS idempotency_keys"));
        assert!(SCHEMA_MIGRATION.contains("CREATE TABLE IF NOT EXISTS isbn_counter"));
    }

    #[test]
    fn test_schema_constraints_present() {
        // The ledger key and the ISBN both serialize through uniqueness
        assert!(SCHEMA_MIGRATION.contains("key     TEXT        PRIMARY KEY"));
        assert!(SCHEMA_MIGRATION.contains("UNIQUE"));
        assert!(SCHEMA_MIGRATION.contains("version       BIGINT NOT NULL DEFAULT 0"));
    }
}
