//! Entity type classification: decide, per type and predicate, whether a field holds
//! scalars or links, and whether scalar fields are multi-valued.

use crate::error::{InductionError, InductionResult};
use crate::schema::OrderedMap;
use crate::triple::Value;

use super::entity::Entities;
use super::naming::TYPE_PREDICATE;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralField {
    /// Some entity has more than one value for this field.
    pub multi: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkField;

/// Shape shared by all entities with one type label.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityType {
    pub name: String,
    pub literals: OrderedMap<LiteralField>,
    pub links: OrderedMap<LinkField>,
    /// Number of entities carrying this type label.
    pub entity_count: usize,
}

impl EntityType {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            literals: OrderedMap::new(),
            links: OrderedMap::new(),
            entity_count: 0,
        }
    }
}

/// Build entity types by aggregating every entity sharing a type label.
///
/// A predicate that carries literal values on some entities of a type and links on
/// others (or on the same entity) is rejected: it has no single column shape.
pub fn classify_types(entities: &Entities) -> InductionResult<OrderedMap<EntityType>> {
    let mut types: OrderedMap<EntityType> = OrderedMap::new();

    for entity in entities.values() {
        if !types.contains_key(&entity.type_name) {
            types.insert(entity.type_name.clone(), EntityType::new(&entity.type_name));
        }
        let Some(entity_type) = types.get_mut(&entity.type_name) else {
            continue;
        };
        entity_type.entity_count += 1;

        for (predicate, values) in entity.values.iter() {
            if predicate == TYPE_PREDICATE {
                continue;
            }

            let literal_count = values.iter().filter(|v| v.is_literal()).count();
            let link_count = values.iter().filter(|v| matches!(v, Value::Link(_))).count();

            if literal_count > 0 {
                if !entity_type.literals.contains_key(predicate) {
                    entity_type.literals.insert(predicate, LiteralField::default());
                }
                if literal_count > 1 {
                    if let Some(field) = entity_type.literals.get_mut(predicate) {
                        field.multi = true;
                    }
                }
            }

            if link_count > 0 && !entity_type.links.contains_key(predicate) {
                entity_type.links.insert(predicate, LinkField);
            }
        }
    }

    for entity_type in types.values() {
        if let Some(predicate) = entity_type
            .literals
            .keys()
            .find(|p| entity_type.links.contains_key(p))
        {
            return Err(InductionError::MixedField {
                type_name: entity_type.name.clone(),
                predicate: predicate.to_string(),
            });
        }
    }

    tracing::debug!(types = types.len(), "classified entity types");
    Ok(types)
}
