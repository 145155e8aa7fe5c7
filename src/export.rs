//! Export types for serializing an induced schema.
//!
//! These types provide a flat, JSON-friendly view of the tables: columns as a list
//! in definition order, rows without their internal keys, and the rendered
//! `CREATE TABLE` text next to each table.

use serde::Serialize;

use crate::induce::{InducedSchema, Relation};
use crate::persist::create_table_statement;
use crate::schema::{ForeignKey, Row, SqlType, Table};

/// Exported column definition.
#[derive(Debug, Clone, Serialize)]
pub struct FieldExport {
    pub name: String,
    /// Declared SQL type (`TEXT`, `INTEGER`, `REAL`).
    pub sql_type: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Exported table with its rows.
#[derive(Debug, Clone, Serialize)]
pub struct TableExport {
    pub name: String,
    pub primary_key: Option<String>,
    pub fields: Vec<FieldExport>,
    pub foreign_keys: Vec<ForeignKey>,
    /// The statement a persister would execute for this table.
    pub create_statement: String,
    pub rows: Vec<Row>,
}

impl TableExport {
    pub fn from_table(table: &Table) -> Self {
        let mut fields = Vec::with_capacity(table.fields.len() + 1);
        if let Some(pk) = &table.primary_key {
            fields.push(FieldExport {
                name: pk.clone(),
                sql_type: SqlType::Text.to_string(),
                nullable: false,
                comment: None,
            });
        }
        fields.extend(table.fields.iter().map(|(name, field)| FieldExport {
            name: name.to_string(),
            sql_type: field.sql_type.to_string(),
            nullable: field.nullable,
            comment: field.comment.clone(),
        }));

        Self {
            name: table.name.clone(),
            primary_key: table.primary_key.clone(),
            fields,
            foreign_keys: table.foreign_keys.clone(),
            create_statement: create_table_statement(table),
            rows: table.rows.values().cloned().collect(),
        }
    }
}

/// Exported induction result.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaExport {
    pub relations: Vec<Relation>,
    pub tables: Vec<TableExport>,
}

impl SchemaExport {
    pub fn from_schema(schema: &InducedSchema) -> Self {
        Self {
            relations: schema.relations.clone(),
            tables: schema.tables.iter().map(TableExport::from_table).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CellValue, TableField};

    #[test]
    fn table_export_lists_primary_key_first() {
        let mut table = Table::new("Person", Some("personId".into()));
        table.fields.insert(
            "age",
            TableField {
                sql_type: SqlType::Integer,
                nullable: true,
                comment: None,
            },
        );
        let mut row = Row::new();
        row.insert("personId", CellValue::from("p1"));
        row.insert("age", CellValue::Integer(36));
        table.rows.insert("p1", row);

        let export = TableExport::from_table(&table);
        let names: Vec<&str> = export.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["personId", "age"]);
        assert_eq!(export.fields[1].sql_type, "INTEGER");

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["rows"][0]["age"], 36);
        assert_eq!(json["rows"][0]["personId"], "p1");
        assert!(
            json["create_statement"]
                .as_str()
                .unwrap()
                .starts_with("CREATE TABLE Person (")
        );
    }
}
