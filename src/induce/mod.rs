//! Relational schema induction.
//!
//! [`induce`] is a pure function from a triple set and a configuration to a table
//! set. Stages run once, in order, each consuming the previous one's output:
//!
//! 1. filter and group triples into entities ([`entity`])
//! 2. classify entity types and their fields ([`classify`])
//! 3. classify relations between types ([`relation`])
//! 4. build and populate tables ([`build`])
//! 5. infer column types ([`infer`])
//! 6. apply configured renames, removals and comments ([`crate::postprocess`])
//!
//! Any error aborts the run before a single table is returned.

pub mod build;
pub mod classify;
pub mod entity;
pub mod infer;
pub mod naming;
pub mod relation;

use serde::Serialize;

use crate::config::ConversionConfig;
use crate::error::Kg2SqlResult;
use crate::postprocess::postprocess;
use crate::schema::Table;
use crate::triple::RawTriple;

pub use classify::{EntityType, LinkField, LiteralField};
pub use entity::{Entities, Entity};
pub use relation::{Cardinality, Relation};

/// Result of one induction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InducedSchema {
    /// Classified relations, sorted by `(type_a, predicate, type_b)`.
    pub relations: Vec<Relation>,
    /// Finalized tables: entity tables in order of first appearance, then junction
    /// tables.
    pub tables: Vec<Table>,
}

impl InducedSchema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Induce a relational schema and its rows from a triple set.
pub fn induce(triples: &[RawTriple], config: &ConversionConfig) -> Kg2SqlResult<InducedSchema> {
    let entities = entity::assemble_entities(triples, config)?;
    let types = classify::classify_types(&entities)?;
    let relations = relation::analyze_relations(&entities)?;
    tracing::info!(
        triples = triples.len(),
        entities = entities.len(),
        types = types.len(),
        relations = relations.len(),
        "analyzed graph"
    );

    let mut tables = build::build_tables(&entities, &types, &relations, config)?;
    infer::infer_column_types(&mut tables);
    postprocess(&mut tables, config)?;

    let tables: Vec<Table> = tables.into_values().collect();
    tracing::info!(
        tables = tables.len(),
        rows = tables.iter().map(Table::row_count).sum::<usize>(),
        "induced schema"
    );

    Ok(InducedSchema { relations, tables })
}
