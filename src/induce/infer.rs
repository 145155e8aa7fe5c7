//! Column type inference and value coercion.

use crate::schema::{CellValue, OrderedMap, SqlType, Table};

#[derive(Debug, Default, Clone, Copy)]
struct ColumnScan {
    nullable: bool,
    integers: bool,
    floats: bool,
    strings: bool,
}

fn scan_value(value: &CellValue, scan: &mut ColumnScan) {
    match value {
        CellValue::Integer(_) => scan.integers = true,
        CellValue::Real(_) => scan.floats = true,
        CellValue::Text(text) => {
            let text = text.trim();
            if text.parse::<i64>().is_ok() {
                scan.integers = true;
            } else if text.parse::<f64>().is_ok() {
                scan.floats = true;
            } else {
                scan.strings = true;
            }
        }
    }
}

impl ColumnScan {
    fn sql_type(&self) -> SqlType {
        if self.strings {
            SqlType::Text
        } else if self.floats {
            SqlType::Real
        } else if self.integers {
            SqlType::Integer
        } else {
            SqlType::Text
        }
    }
}

fn coerce(value: &CellValue, sql_type: SqlType) -> Option<CellValue> {
    match (sql_type, value) {
        (SqlType::Integer, CellValue::Text(text)) => text.trim().parse().ok().map(CellValue::Integer),
        (SqlType::Real, CellValue::Text(text)) => text.trim().parse().ok().map(CellValue::Real),
        (SqlType::Real, CellValue::Integer(i)) => Some(CellValue::Real(*i as f64)),
        _ => None,
    }
}

/// Decide each field's SQL type and nullability, then convert numeric columns.
///
/// Priority: any non-numeric value makes the column TEXT, otherwise any float makes
/// it REAL, otherwise INTEGER. A column without any present value is TEXT. A column
/// missing from at least one row becomes nullable; a column already marked nullable
/// (relation columns) is never tightened. Primary keys are not fields and stay TEXT.
pub fn infer_column_types(tables: &mut OrderedMap<Table>) {
    for table in tables.values_mut() {
        infer_table(table);
    }
}

pub fn infer_table(table: &mut Table) {
    let field_names: Vec<String> = table.fields.keys().map(str::to_string).collect();

    for name in field_names {
        let mut scan = ColumnScan::default();
        for row in table.rows.values() {
            match row.get(&name) {
                Some(value) => scan_value(value, &mut scan),
                None => scan.nullable = true,
            }
        }

        let sql_type = scan.sql_type();
        if let Some(field) = table.fields.get_mut(&name) {
            field.sql_type = sql_type;
            field.nullable = field.nullable || scan.nullable;
        }

        if sql_type != SqlType::Text {
            for row in table.rows.values_mut() {
                let converted = row.get(&name).and_then(|v| coerce(v, sql_type));
                if let Some(converted) = converted {
                    row.insert(name.clone(), converted);
                }
            }
        }
    }
}
