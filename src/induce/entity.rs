//! Entity assembly: group filtered facts by subject and derive type labels.

use crate::config::ConversionConfig;
use crate::error::FilterResult;
use crate::schema::OrderedMap;
use crate::triple::{RawObject, RawTriple, Value};

use super::naming::{TYPE_PREDICATE, predicate_name};

/// All facts sharing one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Subject with configured prefixes stripped.
    pub name: String,
    /// Sorted, dash-joined type targets (after alias substitution). Empty when the
    /// entity has no type facts.
    pub type_name: String,
    /// Predicate to values, in arrival order. Duplicates are kept.
    pub values: OrderedMap<Vec<Value>>,
}

impl Entity {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: String::new(),
            values: OrderedMap::new(),
        }
    }

    pub fn values_of(&self, predicate: &str) -> &[Value] {
        self.values.get(predicate).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First literal value for a predicate.
    ///
    /// Which value is "first" is only stable because triples are sorted before
    /// assembly; for single-valued fields there is exactly one anyway.
    pub fn first_literal(&self, predicate: &str) -> Option<&str> {
        self.values_of(predicate).iter().find_map(Value::as_literal)
    }

    /// Distinct link targets for a predicate, in arrival order.
    pub fn link_targets(&self, predicate: &str) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for target in self.values_of(predicate).iter().filter_map(Value::as_link) {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }
}

/// Entities of one run, keyed by name in order of first appearance.
pub type Entities = OrderedMap<Entity>;

/// Group triples by subject.
///
/// Triples are processed in their total order (subject, predicate, object) so that
/// value order inside every entity is identical across runs, whatever order the
/// graph store produced them in. The input slice itself is left untouched.
pub fn assemble_entities(triples: &[RawTriple], config: &ConversionConfig) -> FilterResult<Entities> {
    let pipeline = config.filter_pipeline();

    let mut sorted: Vec<&RawTriple> = triples.iter().collect();
    sorted.sort();

    let mut entities = Entities::new();
    for triple in sorted {
        let subject = config.strip_name(&triple.subject);
        let predicate = predicate_name(&triple.predicate);
        let original = match &triple.object {
            RawObject::Literal(value) => Value::Literal(value.clone()),
            RawObject::Iri(target) => Value::Link(config.strip_name(target).to_string()),
        };

        if !entities.contains_key(subject) {
            entities.insert(subject, Entity::new(subject));
        }
        let Some(entity) = entities.get_mut(subject) else {
            continue;
        };

        for fact in pipeline.process(&predicate, original)? {
            match entity.values.get_mut(&fact.predicate) {
                Some(values) => values.push(fact.value),
                None => {
                    entity.values.insert(fact.predicate, vec![fact.value]);
                }
            }
        }
    }

    for entity in entities.values_mut() {
        entity.type_name = type_label(entity, config);
    }

    tracing::debug!(
        triples = triples.len(),
        entities = entities.len(),
        "assembled entities"
    );
    Ok(entities)
}

/// Sorted, dash-joined type targets, replaced by its alias when one is configured.
fn type_label(entity: &Entity, config: &ConversionConfig) -> String {
    let mut types: Vec<&str> = entity
        .values_of(TYPE_PREDICATE)
        .iter()
        .filter_map(Value::as_link)
        .collect();
    types.sort_unstable();
    types.dedup();
    let label = types.join("-");
    config.table_name(&label).to_string()
}
