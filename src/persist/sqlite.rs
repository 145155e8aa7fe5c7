//! SQLite persister backed by rusqlite.

use std::path::{Path, PathBuf};

use rusqlite::types::{ToSql, ToSqlOutput};
use rusqlite::{Connection, params_from_iter};
use tracing::{debug, info};

use crate::schema::{CellValue, Table};

use super::{
    PersistError, PersistResult, PersistStats, Persister, create_table_statement, insert_statement,
};

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            CellValue::Text(s) => ToSqlOutput::from(s.as_str()),
            CellValue::Integer(i) => ToSqlOutput::from(*i),
            CellValue::Real(r) => ToSqlOutput::from(*r),
        })
    }
}

/// Writes tables into a new SQLite database file.
#[derive(Debug, Clone)]
pub struct SqlitePersister {
    path: PathBuf,
    overwrite: bool,
}

impl SqlitePersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            overwrite: false,
        }
    }

    /// Replace an existing database file instead of refusing to write.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn prepare_output(&self) -> PersistResult<()> {
        if self.path.exists() {
            if !self.overwrite {
                return Err(PersistError::OutputExists {
                    path: self.path.display().to_string(),
                });
            }
            std::fs::remove_file(&self.path).map_err(|e| PersistError::Io {
                path: self.path.display().to_string(),
                source: e,
            })?;
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PersistError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}

impl Persister for SqlitePersister {
    fn persist(&mut self, tables: &[Table]) -> PersistResult<PersistStats> {
        self.prepare_output()?;
        info!(path = %self.path.display(), "writing SQLite database");
        let mut conn = Connection::open(&self.path)?;
        persist_to_connection(&mut conn, tables)
    }
}

/// Create and fill every table inside a single transaction.
pub fn persist_to_connection(conn: &mut Connection, tables: &[Table]) -> PersistResult<PersistStats> {
    let tx = conn.transaction()?;
    let mut stats = PersistStats::default();

    for table in tables {
        tx.execute(&create_table_statement(table), [])?;
        for row in table.rows.values() {
            let insert = insert_statement(table, row);
            tx.execute(&insert.sql, params_from_iter(insert.params.iter()))?;
        }
        debug!(table = %table.name, rows = table.row_count(), "table persisted");
        stats.tables += 1;
        stats.rows += table.row_count();
    }

    tx.commit()?;
    info!(tables = stats.tables, rows = stats.rows, "persisted tables");
    Ok(stats)
}
