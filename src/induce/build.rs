//! Schema construction: one table per entity type, relation columns and junction
//! tables, and row population.

use crate::config::ConversionConfig;
use crate::error::{InductionError, InductionResult};
use crate::schema::{CellValue, ForeignKey, OrderedMap, Row, Table, TableField};

use super::classify::EntityType;
use super::entity::{Entities, Entity};
use super::naming::{junction_table_name, relation_column_name, table_key_name};
use super::relation::{Cardinality, Relation};

/// Where a relation is stored, with every name already resolved through the
/// configured aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationLayout {
    /// Column on `holder` referencing `referenced`.
    Column {
        holder: String,
        column: String,
        referenced: String,
    },
    /// Junction table with one row per edge.
    Junction {
        table: String,
        key_a: String,
        key_b: String,
    },
}

impl RelationLayout {
    pub fn for_relation(relation: &Relation, config: &ConversionConfig) -> Self {
        let column = |holder: &str, referenced: &str| Self::Column {
            holder: holder.to_string(),
            column: config.relation_key(
                &relation_column_name(holder, referenced),
                &relation.predicate,
            ),
            referenced: referenced.to_string(),
        };
        match relation.cardinality {
            Cardinality::OneToMany => column(&relation.type_b, &relation.type_a),
            Cardinality::ManyToOne | Cardinality::OneToOne => {
                column(&relation.type_a, &relation.type_b)
            }
            Cardinality::ManyToMany => Self::Junction {
                table: junction_table_name(&relation.type_a, &relation.type_b),
                key_a: table_key_name(&relation.type_a),
                key_b: table_key_name(&relation.type_b),
            },
        }
    }
}

fn add_field(table: &mut Table, name: &str, field: TableField) -> InductionResult<()> {
    if table.fields.contains_key(name) || table.primary_key.as_deref() == Some(name) {
        return Err(InductionError::ColumnConflict {
            table: table.name.clone(),
            field: name.to_string(),
        });
    }
    table.fields.insert(name, field);
    Ok(())
}

fn table_mut<'a>(tables: &'a mut OrderedMap<Table>, name: &str) -> InductionResult<&'a mut Table> {
    tables
        .get_mut(name)
        .ok_or_else(|| InductionError::MissingTable {
            table: name.to_string(),
        })
}

/// Targets of `entity` via `predicate` that belong to `target_type`.
fn typed_targets<'e>(
    entity: &'e Entity,
    predicate: &str,
    target_type: &str,
    entities: &'e Entities,
) -> Vec<&'e Entity> {
    entity
        .link_targets(predicate)
        .into_iter()
        .filter_map(|name| entities.get(name))
        .filter(|target| target.type_name == target_type)
        .collect()
}

/// Map entity types to tables and populate them.
///
/// Field types are left at their defaults; [`super::infer::infer_column_types`]
/// decides them afterwards.
pub fn build_tables(
    entities: &Entities,
    types: &OrderedMap<EntityType>,
    relations: &[Relation],
    config: &ConversionConfig,
) -> InductionResult<OrderedMap<Table>> {
    let mut tables: OrderedMap<Table> = OrderedMap::new();

    for entity_type in types.values() {
        let mut table = Table::new(&entity_type.name, Some(table_key_name(&entity_type.name)));
        for (literal, field) in entity_type.literals.iter() {
            if field.multi {
                return Err(InductionError::MultiValuedLiteral {
                    type_name: entity_type.name.clone(),
                    predicate: literal.to_string(),
                });
            }
            add_field(&mut table, literal, TableField::default())?;
        }
        tables.insert(entity_type.name.clone(), table);
    }

    let layouts: Vec<RelationLayout> = relations
        .iter()
        .map(|r| RelationLayout::for_relation(r, config))
        .collect();

    for (relation, layout) in relations.iter().zip(&layouts) {
        match layout {
            RelationLayout::Column {
                holder,
                column,
                referenced,
            } => {
                let table = table_mut(&mut tables, holder)?;
                add_field(
                    table,
                    column,
                    TableField {
                        nullable: true,
                        ..Default::default()
                    },
                )?;
                table.foreign_keys.push(ForeignKey {
                    field: column.clone(),
                    referenced_table: referenced.clone(),
                    referenced_key: table_key_name(referenced),
                });
            }
            RelationLayout::Junction { table, key_a, key_b } => {
                if tables.contains_key(table) {
                    return Err(InductionError::TableConflict {
                        table: table.clone(),
                    });
                }
                let mut junction = Table::new(table.clone(), None);
                // A self-relation would need two key columns with the same name.
                add_field(&mut junction, key_a, TableField::default())?;
                add_field(&mut junction, key_b, TableField::default())?;
                junction.foreign_keys.push(ForeignKey {
                    field: key_a.clone(),
                    referenced_table: relation.type_a.clone(),
                    referenced_key: key_a.clone(),
                });
                junction.foreign_keys.push(ForeignKey {
                    field: key_b.clone(),
                    referenced_table: relation.type_b.clone(),
                    referenced_key: key_b.clone(),
                });
                tables.insert(table.clone(), junction);
            }
        }
    }

    // Entity rows: primary key plus present literal values.
    for entity in entities.values() {
        let Some(entity_type) = types.get(&entity.type_name) else {
            continue;
        };
        let table = table_mut(&mut tables, &entity.type_name)?;
        let mut row = Row::new();
        if let Some(pk) = &table.primary_key {
            row.insert(pk.clone(), CellValue::from(entity.name.as_str()));
        }
        for literal in entity_type.literals.keys() {
            if let Some(value) = entity.first_literal(literal) {
                row.insert(literal, CellValue::from(value));
            }
        }
        table.rows.insert(entity.name.clone(), row);
    }

    // Relation values overlay the entity rows.
    for (relation, layout) in relations.iter().zip(&layouts) {
        let sources = entities
            .values()
            .filter(|e| e.type_name == relation.type_a);

        match layout {
            RelationLayout::Column { holder, column, .. } => {
                let table = table_mut(&mut tables, holder)?;
                for source in sources {
                    for target in typed_targets(source, &relation.predicate, &relation.type_b, entities) {
                        let (row_key, value) = match relation.cardinality {
                            // One source, many targets: each target points back.
                            Cardinality::OneToMany => (&target.name, &source.name),
                            _ => (&source.name, &target.name),
                        };
                        if let Some(row) = table.rows.get_mut(row_key) {
                            row.insert(column.clone(), CellValue::from(value.as_str()));
                        }
                    }
                }
            }
            RelationLayout::Junction { table, key_a, key_b } => {
                let junction = table_mut(&mut tables, table)?;
                for source in sources {
                    for target in typed_targets(source, &relation.predicate, &relation.type_b, entities) {
                        let mut row = Row::new();
                        row.insert(key_a.clone(), CellValue::from(source.name.as_str()));
                        row.insert(key_b.clone(), CellValue::from(target.name.as_str()));
                        junction.rows.insert(format!("{}\t{}", source.name, target.name), row);
                    }
                }
            }
        }
    }

    tracing::debug!(tables = tables.len(), "built tables");
    Ok(tables)
}
