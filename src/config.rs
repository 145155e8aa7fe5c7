//! Conversion configuration, persisted as TOML.
//!
//! ```toml
//! strip_uri_prefixes = ["http://example.org/cars/"]
//! ignore_tables = ["Thing"]
//!
//! [[triple_filters]]
//! type = "remove_unit"
//! predicates = ["range"]
//! unit = "km"
//!
//! [table_aliases]
//! "Car-Vehicle" = "car"
//!
//! [table_field_comments.car]
//! range = "in kilometers"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{FilterPipeline, TripleFilter};

/// Errors from loading a conversion configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(kg2sql::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(kg2sql::config::parse),
        help(
            "Check the TOML syntax. Every triple filter needs a `type` \
             (parse_german_number, remove_unit, drop, ignore_values, split_range) \
             and a `predicates` list."
        )
    )]
    Parse { path: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// User-supplied options steering induction and postprocessing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// IRI prefixes removed from entity names and link targets (first match wins).
    pub strip_uri_prefixes: Vec<String>,
    /// Filters applied to every triple, consulted in this order.
    pub triple_filters: Vec<TripleFilter>,
    /// Raw composite type label -> table name.
    pub table_aliases: BTreeMap<String, String>,
    /// Default relation column name -> alias. A key may be qualified with the
    /// predicate (`articleToPerson.reviewedBy`) to rename one relation only.
    pub relation_key_aliases: BTreeMap<String, String>,
    /// Table -> field -> column comment.
    pub table_field_comments: BTreeMap<String, BTreeMap<String, String>>,
    /// Tables dropped after all other postprocessing.
    pub ignore_tables: Vec<String>,
    /// Table -> fields to drop.
    pub ignore_table_fields: BTreeMap<String, Vec<String>>,
    /// Table -> field -> new field name.
    pub table_field_aliases: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConversionConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Remove the first matching configured prefix from an IRI.
    pub fn strip_name<'a>(&self, name: &'a str) -> &'a str {
        self.strip_uri_prefixes
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix.as_str()))
            .unwrap_or(name)
    }

    pub fn filter_pipeline(&self) -> FilterPipeline {
        FilterPipeline::new(self.triple_filters.clone())
    }

    /// Table name for a raw composite type label.
    pub fn table_name<'a>(&'a self, type_label: &'a str) -> &'a str {
        self.table_aliases
            .get(type_label)
            .map(String::as_str)
            .unwrap_or(type_label)
    }

    /// Column name for a relation.
    ///
    /// A predicate-qualified key (`articleToPerson.reviewedBy`) wins over the bare
    /// default name, so two predicates between the same types can be told apart.
    pub fn relation_key(&self, default_name: &str, predicate: &str) -> String {
        self.relation_key_aliases
            .get(&format!("{default_name}.{predicate}"))
            .or_else(|| self.relation_key_aliases.get(default_name))
            .cloned()
            .unwrap_or_else(|| default_name.to_string())
    }
}
