//! Rich diagnostic error types for kg2sql.
//!
//! Every failure in a conversion run is fatal: the run either yields a complete
//! table set or stops before anything reaches the persister. Each subsystem has its
//! own error enum with miette `#[diagnostic]` derives so the user sees a stable error
//! code and a hint on how to fix the input or the configuration.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::persist::PersistError;
use crate::rdf::RdfError;

/// Top-level error type for a conversion run.
#[derive(Debug, Error, Diagnostic)]
pub enum Kg2SqlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Induction(#[from] InductionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Postprocess(#[from] PostprocessError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rdf(#[from] RdfError),
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum FilterError {
    #[error("predicate {predicate}: cannot parse \"{value}\" as a number")]
    #[diagnostic(
        code(kg2sql::filter::invalid_number),
        help(
            "A number-normalizing filter claims this predicate but the value is not numeric \
             after separators and units were removed. Check the filter's unit and separator \
             options, or exclude the value with an `ignore_values` filter listed first."
        )
    )]
    InvalidNumber { predicate: String, value: String },

    #[error("predicate {predicate}: cannot parse \"{value}\" as a duration")]
    #[diagnostic(
        code(kg2sql::filter::invalid_duration),
        help("Durations must have the form `A:B` with two integer components, e.g. `12:30`.")
    )]
    InvalidDuration { predicate: String, value: String },
}

// ---------------------------------------------------------------------------
// Induction errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InductionError {
    #[error("field {predicate} of type \"{type_name}\" has both literal values and links to other entities")]
    #[diagnostic(
        code(kg2sql::induce::mixed_field),
        help(
            "A column cannot be both a scalar and a relation. Drop the predicate with a \
             `drop` filter, or suppress the offending values with `ignore_values`."
        )
    )]
    MixedField { type_name: String, predicate: String },

    #[error("literal field {predicate} of type \"{type_name}\" has multiple values per entity")]
    #[diagnostic(
        code(kg2sql::induce::multi_valued_literal),
        help(
            "Multi-valued literal columns are not supported. Drop the predicate with a `drop` \
             filter or split its values into distinct predicates."
        )
    )]
    MultiValuedLiteral { type_name: String, predicate: String },

    #[error(
        "relation ({type_a}, {predicate}, {type_b}) has fan-out {fan_out} and fan-in {fan_in}"
    )]
    #[diagnostic(
        code(kg2sql::induce::cardinality),
        help("Every observed link must contribute at least one edge in each direction. This is a bug.")
    )]
    Cardinality {
        type_a: String,
        predicate: String,
        type_b: String,
        fan_out: usize,
        fan_in: usize,
    },

    #[error("entity {entity} links via {predicate} to unknown entity {target}")]
    #[diagnostic(
        code(kg2sql::induce::dangling_link),
        help(
            "Link targets must appear as the subject of at least one triple. Add facts for the \
             target, or drop the predicate with a `drop` filter."
        )
    )]
    DanglingLink {
        entity: String,
        predicate: String,
        target: String,
    },

    #[error("table {table} would get column {field} twice")]
    #[diagnostic(
        code(kg2sql::induce::column_conflict),
        help(
            "Two fields or relations map to the same column name. Rename one relation with a \
             predicate-qualified `relation_key_aliases` key, e.g. \
             `\"articleToPerson.reviewedBy\" = \"reviewer\"`."
        )
    )]
    ColumnConflict { table: String, field: String },

    #[error("table {table} would be created twice")]
    #[diagnostic(
        code(kg2sql::induce::table_conflict),
        help(
            "Two entity types or many-to-many relations map to the same table name. \
             Adjust `table_aliases` so every type gets a distinct table."
        )
    )]
    TableConflict { table: String },

    #[error("table {table} is referenced but was never created")]
    #[diagnostic(
        code(kg2sql::induce::missing_table),
        help("Every entity type and relation endpoint owns a table. This is a bug.")
    )]
    MissingTable { table: String },
}

// ---------------------------------------------------------------------------
// Postprocessing errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PostprocessError {
    #[error("{option} references unknown table {table}")]
    #[diagnostic(
        code(kg2sql::postprocess::unknown_table),
        help("Run `kg2sql schema` to list the induced tables and fix the table name.")
    )]
    UnknownTable { option: &'static str, table: String },

    #[error("{option} references unknown field {field} of table {table}")]
    #[diagnostic(
        code(kg2sql::postprocess::unknown_field),
        help(
            "Run `kg2sql schema` to list the columns of the table. Field renames apply \
             before removals and comments, so later options must use the new name."
        )
    )]
    UnknownField {
        option: &'static str,
        table: String,
        field: String,
    },

    #[error("{option} would create duplicate field {field} in table {table}")]
    #[diagnostic(
        code(kg2sql::postprocess::duplicate_field),
        help("Pick an alias that does not collide with an existing column.")
    )]
    DuplicateField {
        option: &'static str,
        table: String,
        field: String,
    },
}

/// Convenience alias for functions returning kg2sql results.
pub type Kg2SqlResult<T> = std::result::Result<T, Kg2SqlError>;

pub type FilterResult<T> = std::result::Result<T, FilterError>;

pub type InductionResult<T> = std::result::Result<T, InductionError>;

pub type PostprocessResult<T> = std::result::Result<T, PostprocessError>;
