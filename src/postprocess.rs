//! Schema postprocessing: user-configured renames, removals and comments.
//!
//! Steps run strictly in this order:
//!
//! 1. field renames (`table_field_aliases`)
//! 2. field removals (`ignore_table_fields`)
//! 3. comments (`table_field_comments`)
//! 4. table removals (`ignore_tables`)
//!
//! Later steps see the names produced by earlier ones. Table removal comes last, so
//! options targeting a removed table are validated and then discarded with it.
//! Referencing a table or field that does not exist is an error.

use crate::config::ConversionConfig;
use crate::error::{PostprocessError, PostprocessResult};
use crate::schema::{OrderedMap, Table};

fn table_mut<'a>(
    tables: &'a mut OrderedMap<Table>,
    option: &'static str,
    name: &str,
) -> PostprocessResult<&'a mut Table> {
    tables.get_mut(name).ok_or_else(|| PostprocessError::UnknownTable {
        option,
        table: name.to_string(),
    })
}

fn unknown_field(option: &'static str, table: &Table, field: &str) -> PostprocessError {
    PostprocessError::UnknownField {
        option,
        table: table.name.clone(),
        field: field.to_string(),
    }
}

/// Move a field definition and every row's value to a new name.
///
/// The renamed column moves to the end of the column order.
pub fn rename_field(table: &mut Table, field: &str, alias: &str) -> PostprocessResult<()> {
    const OPTION: &str = "table_field_aliases";
    if field == alias {
        return Ok(());
    }
    if table.fields.contains_key(alias) || table.primary_key.as_deref() == Some(alias) {
        return Err(PostprocessError::DuplicateField {
            option: OPTION,
            table: table.name.clone(),
            field: alias.to_string(),
        });
    }
    let definition = table
        .fields
        .remove(field)
        .ok_or_else(|| unknown_field(OPTION, table, field))?;
    table.fields.insert(alias, definition);

    for fk in table.foreign_keys.iter_mut().filter(|fk| fk.field == field) {
        fk.field = alias.to_string();
    }
    for row in table.rows.values_mut() {
        if let Some(value) = row.remove(field) {
            row.insert(alias, value);
        }
    }
    Ok(())
}

/// Delete a field definition and its value from every row.
pub fn remove_field(table: &mut Table, field: &str) -> PostprocessResult<()> {
    table
        .fields
        .remove(field)
        .ok_or_else(|| unknown_field("ignore_table_fields", table, field))?;
    table.foreign_keys.retain(|fk| fk.field != field);
    for row in table.rows.values_mut() {
        row.remove(field);
    }
    Ok(())
}

/// Apply every postprocessing option from the configuration.
pub fn postprocess(tables: &mut OrderedMap<Table>, config: &ConversionConfig) -> PostprocessResult<()> {
    for (table_name, aliases) in &config.table_field_aliases {
        let table = table_mut(tables, "table_field_aliases", table_name)?;
        for (field, alias) in aliases {
            rename_field(table, field, alias)?;
        }
    }

    for (table_name, fields) in &config.ignore_table_fields {
        let table = table_mut(tables, "ignore_table_fields", table_name)?;
        for field in fields {
            remove_field(table, field)?;
        }
    }

    for (table_name, comments) in &config.table_field_comments {
        let table = table_mut(tables, "table_field_comments", table_name)?;
        for (field, comment) in comments {
            if !table.fields.contains_key(field) {
                return Err(unknown_field("table_field_comments", table, field));
            }
            if let Some(definition) = table.fields.get_mut(field) {
                definition.comment = Some(comment.clone());
            }
        }
    }

    for table_name in &config.ignore_tables {
        if tables.remove(table_name).is_none() {
            return Err(PostprocessError::UnknownTable {
                option: "ignore_tables",
                table: table_name.clone(),
            });
        }
    }

    Ok(())
}
