//! Relation analysis: classify every `(type_a, predicate, type_b)` link pattern as
//! one-to-one, one-to-many, many-to-one or many-to-many from observed fan-out and
//! fan-in.
//!
//! - fan-out: the most distinct `type_b` targets a single `type_a` entity reaches
//!   via the predicate;
//! - fan-in: the most distinct `type_a` sources pointing at a single `type_b` entity
//!   via the predicate.
//!
//! | fan-out | fan-in | cardinality | foreign key lives on |
//! |---------|--------|-------------|----------------------|
//! | > 1     | > 1    | N:M         | junction table       |
//! | > 1     | 1      | 1:N         | `type_b`'s table     |
//! | 1       | > 1    | N:1         | `type_a`'s table     |
//! | 1       | 1      | 1:1         | `type_a`'s table     |

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

use crate::error::{InductionError, InductionResult};

use super::entity::Entities;
use super::naming::TYPE_PREDICATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    #[serde(rename = "1:1")]
    OneToOne,
    #[serde(rename = "1:N")]
    OneToMany,
    #[serde(rename = "N:1")]
    ManyToOne,
    #[serde(rename = "N:M")]
    ManyToMany,
}

impl Cardinality {
    /// Classify from fan-out and fan-in. `None` if either is zero.
    pub fn classify(fan_out: usize, fan_in: usize) -> Option<Self> {
        match (fan_out, fan_in) {
            (0, _) | (_, 0) => None,
            (a, b) if a > 1 && b > 1 => Some(Self::ManyToMany),
            (a, _) if a > 1 => Some(Self::OneToMany),
            (_, b) if b > 1 => Some(Self::ManyToOne),
            _ => Some(Self::OneToOne),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OneToOne => "1:1",
            Self::OneToMany => "1:N",
            Self::ManyToOne => "N:1",
            Self::ManyToMany => "N:M",
        };
        f.write_str(s)
    }
}

/// A classified link pattern. `type_a` is the source of the predicate, `type_b` the
/// target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub cardinality: Cardinality,
    pub type_a: String,
    pub predicate: String,
    pub type_b: String,
}

type RelationKey = (String, String, String);

#[derive(Debug, Default, Clone, Copy)]
struct FanCounts {
    fan_out: usize,
    fan_in: usize,
}

/// Analyze every link in the entity population.
///
/// Relations come back sorted by `(type_a, predicate, type_b)`.
pub fn analyze_relations(entities: &Entities) -> InductionResult<Vec<Relation>> {
    let mut counts: BTreeMap<RelationKey, FanCounts> = BTreeMap::new();
    // (target, predicate) -> distinct sources
    let mut reverse: HashMap<(&str, &str), BTreeSet<&str>> = HashMap::new();

    for entity in entities.values() {
        for predicate in entity.values.keys() {
            if predicate == TYPE_PREDICATE {
                continue;
            }

            let mut per_type: BTreeMap<&str, usize> = BTreeMap::new();
            for target_name in entity.link_targets(predicate) {
                let target = entities.get(target_name).ok_or_else(|| {
                    InductionError::DanglingLink {
                        entity: entity.name.clone(),
                        predicate: predicate.to_string(),
                        target: target_name.to_string(),
                    }
                })?;
                *per_type.entry(target.type_name.as_str()).or_default() += 1;
                reverse
                    .entry((target_name, predicate))
                    .or_default()
                    .insert(entity.name.as_str());
            }

            for (target_type, count) in per_type {
                let key = (
                    entity.type_name.clone(),
                    predicate.to_string(),
                    target_type.to_string(),
                );
                let entry = counts.entry(key).or_default();
                entry.fan_out = entry.fan_out.max(count);
            }
        }
    }

    for ((target_name, predicate), sources) in &reverse {
        let Some(target) = entities.get(target_name) else {
            continue;
        };
        let mut per_type: BTreeMap<&str, usize> = BTreeMap::new();
        for source in sources {
            if let Some(source) = entities.get(source) {
                *per_type.entry(source.type_name.as_str()).or_default() += 1;
            }
        }
        for (source_type, count) in per_type {
            let key = (
                source_type.to_string(),
                predicate.to_string(),
                target.type_name.clone(),
            );
            let entry = counts.entry(key).or_default();
            entry.fan_in = entry.fan_in.max(count);
        }
    }

    let mut relations = Vec::with_capacity(counts.len());
    for ((type_a, predicate, type_b), fan) in counts {
        let cardinality = Cardinality::classify(fan.fan_out, fan.fan_in).ok_or_else(|| {
            InductionError::Cardinality {
                type_a: type_a.clone(),
                predicate: predicate.clone(),
                type_b: type_b.clone(),
                fan_out: fan.fan_out,
                fan_in: fan.fan_in,
            }
        })?;
        tracing::debug!(
            %cardinality,
            type_a = %type_a,
            predicate = %predicate,
            type_b = %type_b,
            fan_out = fan.fan_out,
            fan_in = fan.fan_in,
            "classified relation"
        );
        relations.push(Relation {
            cardinality,
            type_a,
            predicate,
            type_b,
        });
    }

    Ok(relations)
}
