//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, EngineError, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Execute the schema SQL
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        // Apply migrations for existing databases
        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Databases created before soft deletion lack the deleted_at column
        let has_deleted_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('leads') WHERE name = 'deleted_at'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_deleted_column {
            self.connection
                .execute("ALTER TABLE leads ADD COLUMN deleted_at TEXT", [])
                .map_err(|e| {
                    EngineError::database_error("Failed to add deleted_at column to leads table", e)
                })?;
        }

        Ok(())
    }
}
