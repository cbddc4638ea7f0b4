//! Schema registry and table materialization.

use sqlx::mysql::MySqlConnection;
use tracing::{debug, warn};

use crate::error::DbError;
use crate::metrics;

/// A table declared against the schema registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    name: &'static str,
    columns: &'static str,
}

impl TableDef {
    /// Declare a table from its name and column/constraint DDL.
    pub const fn new(name: &'static str, columns: &'static str) -> Self {
        Self { name, columns }
    }

    /// Table name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Idempotent creation statement.
    pub fn create_statement(&self) -> String {
        format!("CREATE TABLE IF NOT EXISTS `{}` ({})", self.name, self.columns)
    }
}

/// Ordered set of table declarations.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: Vec<TableDef>,
}

impl Schema {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a table. Names already registered are ignored.
    pub fn register(&mut self, table: TableDef) -> &mut Self {
        if self.tables.iter().any(|t| t.name == table.name) {
            warn!(table = table.name, "Table already registered, ignoring");
        } else {
            self.tables.push(table);
        }
        self
    }

    /// Registered tables in declaration order.
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    /// Number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no tables are registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Create every registered table that does not exist yet.
    ///
    /// Returns the number of statements issued. An empty registry never
    /// touches the connection.
    pub async fn create_all(&self, conn: &mut MySqlConnection) -> Result<usize, DbError> {
        for table in &self.tables {
            let statement = table.create_statement();
            debug!(table = table.name, "Creating table if missing");
            sqlx::query(&statement)
                .execute(&mut *conn)
                .await
                .map_err(|source| DbError::CreateTable {
                    table: table.name,
                    source,
                })?;
            metrics::inc_tables_created();
        }
        Ok(self.tables.len())
    }
}
