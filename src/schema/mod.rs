//! Relational table model produced by induction.
//!
//! A [`Table`] carries its column definitions, foreign keys and rows. Entity tables
//! have a text primary key holding the entity name; junction tables for
//! many-to-many relations have none.

pub mod ordered;

use std::fmt;

use serde::Serialize;

pub use ordered::OrderedMap;

/// Column type decided by type inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SqlType {
    Integer,
    Real,
    Text,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One cell of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r:?}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableField {
    pub sql_type: SqlType,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Default for TableField {
    fn default() -> Self {
        Self {
            sql_type: SqlType::Text,
            nullable: false,
            comment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub field: String,
    pub referenced_table: String,
    pub referenced_key: String,
}

/// A row: field name to value. Absent optional values are simply missing.
pub type Row = OrderedMap<CellValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub primary_key: Option<String>,
    pub fields: OrderedMap<TableField>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Rows keyed by entity name (or `a-b` for junction rows).
    pub rows: OrderedMap<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, primary_key: Option<String>) -> Self {
        Self {
            name: name.into(),
            primary_key,
            fields: OrderedMap::new(),
            foreign_keys: Vec::new(),
            rows: OrderedMap::new(),
        }
    }

    /// Primary key (if any) followed by every field, in definition order.
    pub fn columns(&self) -> Vec<&str> {
        self.primary_key
            .as_deref()
            .into_iter()
            .chain(self.fields.keys())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_start_with_primary_key() {
        let mut table = Table::new("person", Some("personId".into()));
        table.fields.insert("name", TableField::default());
        table.fields.insert("age", TableField::default());
        assert_eq!(table.columns(), vec!["personId", "name", "age"]);

        let junction = Table::new("a_to_b", None);
        assert!(junction.columns().is_empty());
    }

    #[test]
    fn cell_values_serialize_untagged() {
        let row: Vec<CellValue> = vec!["x".into(), CellValue::Integer(3), CellValue::Real(2.5)];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"["x",3,2.5]"#);
    }
}
