// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # kg2sql
//!
//! Relational schema induction for knowledge graphs: turns a set of
//! subject-predicate-object triples into typed tables, foreign keys and junction
//! tables, then populates and persists them.
//!
//! ## Architecture
//!
//! - **Triples** (`triple`): raw input triples and filtered facts
//! - **Filters** (`filter`): per-predicate value rewriting, first opinion wins
//! - **Induction** (`induce`): entities, types, relation cardinalities, tables, column types
//! - **Postprocessing** (`postprocess`): configured renames, removals and comments
//! - **Persistence** (`persist`): `CREATE TABLE`/`INSERT` rendering and a SQLite backend
//! - **Graph loading** (`rdf`): oxigraph parsers for Turtle, N-Triples and friends
//!
//! ## Library usage
//!
//! ```
//! use kg2sql::config::ConversionConfig;
//! use kg2sql::induce::induce;
//! use kg2sql::triple::RawTriple;
//!
//! let triples = vec![
//!     RawTriple::link("p1", "22-rdf-syntax-ns#type", "Person"),
//!     RawTriple::literal("p1", "name", "Ada"),
//! ];
//! let schema = induce(&triples, &ConversionConfig::default()).unwrap();
//! let person = schema.table("Person").unwrap();
//! assert_eq!(person.columns(), vec!["personId", "name"]);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod induce;
pub mod persist;
pub mod postprocess;
pub mod preview;
pub mod rdf;
pub mod schema;
pub mod triple;
