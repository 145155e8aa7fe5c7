//! Persistence of induced tables: statement rendering and persister backends.
//!
//! A persister receives the finalized tables in order and emits one `CREATE TABLE`
//! per table followed by one `INSERT` per row. Inserts name exactly the columns a
//! row has, so a missing optional value is left to the column default instead of
//! being written as an explicit NULL.

pub mod sqlite;

use miette::Diagnostic;
use thiserror::Error;

use crate::schema::{CellValue, Row, Table};

pub use sqlite::SqlitePersister;

#[derive(Debug, Error, Diagnostic)]
pub enum PersistError {
    #[error("output database already exists: {path}")]
    #[diagnostic(
        code(kg2sql::persist::exists),
        help("Pass --overwrite to replace it, or choose a different output path.")
    )]
    OutputExists { path: String },

    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(kg2sql::persist::io),
        help("Check that the output directory exists and is writable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SQLite error: {0}")]
    #[diagnostic(
        code(kg2sql::persist::sqlite),
        help(
            "The database rejected a statement. Table and column names come from the \
             graph; rename unusual ones with `table_aliases` or `table_field_aliases`."
        )
    )]
    Sqlite(#[from] rusqlite::Error),
}

pub type PersistResult<T> = std::result::Result<T, PersistError>;

/// Counts reported by a persister.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub tables: usize,
    pub rows: usize,
}

/// Sink for finalized tables.
pub trait Persister {
    fn persist(&mut self, tables: &[Table]) -> PersistResult<PersistStats>;
}

/// Quote an identifier unless it is a plain `[A-Za-z_][A-Za-z0-9_]*` word.
pub fn quote_ident(name: &str) -> String {
    let mut chars = name.chars();
    let plain = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Render the `CREATE TABLE` statement for a table.
///
/// ```text
/// CREATE TABLE Article (
///     articleId TEXT PRIMARY KEY,
///     title TEXT NOT NULL,
///     articleToPerson TEXT, -- author
///     FOREIGN KEY (articleToPerson) REFERENCES Person(personId)
/// )
/// ```
///
/// Items are tab-indented; a field comment follows the separating comma.
pub fn create_table_statement(table: &Table) -> String {
    let mut items: Vec<(String, Option<String>)> = Vec::new();

    if let Some(pk) = &table.primary_key {
        items.push((format!("{} TEXT PRIMARY KEY", quote_ident(pk)), None));
    }
    for (name, field) in table.fields.iter() {
        let mut line = format!("{} {}", quote_ident(name), field.sql_type);
        if !field.nullable {
            line.push_str(" NOT NULL");
        }
        let comment = field.comment.as_ref().map(|c| c.replace(['\n', '\r'], " "));
        items.push((line, comment));
    }
    for fk in &table.foreign_keys {
        items.push((
            format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                quote_ident(&fk.field),
                quote_ident(&fk.referenced_table),
                quote_ident(&fk.referenced_key)
            ),
            None,
        ));
    }

    let mut out = format!("CREATE TABLE {} (", quote_ident(&table.name));
    let last = items.len().saturating_sub(1);
    for (i, (line, comment)) in items.iter().enumerate() {
        out.push_str("\n\t");
        out.push_str(line);
        if i < last {
            out.push(',');
        }
        if let Some(comment) = comment {
            out.push_str(" -- ");
            out.push_str(comment);
        }
    }
    out.push_str("\n)");
    out
}

/// A parameterized `INSERT` for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement<'a> {
    pub sql: String,
    pub params: Vec<&'a CellValue>,
}

pub fn insert_statement<'a>(table: &Table, row: &'a Row) -> InsertStatement<'a> {
    let columns: Vec<String> = row.keys().map(quote_ident).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    InsertStatement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&table.name),
            columns.join(", "),
            placeholders
        ),
        params: row.values().collect(),
    }
}

/// Collects rendered statements instead of executing them.
#[derive(Debug, Default, Clone)]
pub struct MemoryPersister {
    pub creates: Vec<String>,
    pub inserts: Vec<(String, Vec<CellValue>)>,
}

impl Persister for MemoryPersister {
    fn persist(&mut self, tables: &[Table]) -> PersistResult<PersistStats> {
        let mut stats = PersistStats::default();
        for table in tables {
            self.creates.push(create_table_statement(table));
            stats.tables += 1;
            for row in table.rows.values() {
                let insert = insert_statement(table, row);
                self.inserts
                    .push((insert.sql, insert.params.into_iter().cloned().collect()));
                stats.rows += 1;
            }
        }
        Ok(stats)
    }
}
