//! Graph-file loading via oxigraph's RDF parsers.
//!
//! Induction itself only consumes [`RawTriple`]s; this module is the thin adapter
//! that turns a Turtle, N-Triples, N-Quads, TriG, N3 or RDF/XML file into them.
//! Graph names of quads are ignored.
//!
//! Blank nodes are relabelled `_:b0`, `_:b1`, ... in order of first appearance, so an
//! anonymous node (`[]`), whose parser-assigned id is random, still yields the same
//! entity name on every run over the same file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use miette::Diagnostic;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term;
use thiserror::Error;

use crate::triple::{RawObject, RawTriple};

#[derive(Debug, Error, Diagnostic)]
pub enum RdfError {
    #[error("unknown RDF format: {name}")]
    #[diagnostic(
        code(kg2sql::rdf::unknown_format),
        help("Use one of: turtle (ttl), ntriples (nt), nquads (nq), trig, n3, rdfxml (rdf).")
    )]
    UnknownFormat { name: String },

    #[error("failed to read graph file: {path}")]
    #[diagnostic(
        code(kg2sql::rdf::io),
        help("Ensure the input file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse graph: {message}")]
    #[diagnostic(
        code(kg2sql::rdf::parse),
        help("Check the file's syntax, or pass --format if the extension is misleading.")
    )]
    Parse { message: String },
}

pub type RdfResult<T> = std::result::Result<T, RdfError>;

/// Resolve a format name or file extension.
pub fn format_from_name(name: &str) -> RdfResult<RdfFormat> {
    let lower = name.trim_start_matches('.').to_ascii_lowercase();
    let extension = match lower.as_str() {
        "turtle" => "ttl",
        "ntriples" | "n-triples" => "nt",
        "nquads" | "n-quads" => "nq",
        "rdfxml" | "rdf/xml" | "xml" => "rdf",
        other => other,
    };
    RdfFormat::from_extension(extension).ok_or_else(|| RdfError::UnknownFormat {
        name: name.to_string(),
    })
}

/// Guess a format from a file's extension.
pub fn format_from_path(path: &Path) -> RdfResult<RdfFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| RdfError::UnknownFormat {
            name: path.display().to_string(),
        })?;
    format_from_name(extension)
}

/// Load every triple of a graph file. The format is guessed from the extension when
/// not given.
pub fn load_triples(path: &Path, format: Option<RdfFormat>) -> RdfResult<Vec<RawTriple>> {
    let format = match format {
        Some(format) => format,
        None => format_from_path(path)?,
    };
    let file = File::open(path).map_err(|e| RdfError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let triples = parse_triples(BufReader::new(file), format)?;
    tracing::info!(path = %path.display(), triples = triples.len(), "loaded graph");
    Ok(triples)
}

pub fn parse_triples<R: Read>(reader: R, format: RdfFormat) -> RdfResult<Vec<RawTriple>> {
    let mut triples = Vec::new();
    let mut blank_labels = BlankLabels::default();
    for quad in RdfParser::from_format(format).for_reader(reader) {
        let quad = quad.map_err(|e| RdfError::Parse {
            message: e.to_string(),
        })?;
        let Some(subject) = blank_labels.term_object(Term::from(quad.subject)) else {
            continue;
        };
        let Some(object) = blank_labels.term_object(quad.object) else {
            continue;
        };
        triples.push(RawTriple {
            subject: subject.text().to_string(),
            predicate: quad.predicate.into_string(),
            object,
        });
    }
    Ok(triples)
}

/// Parser blank-node id to stable `_:bN` label.
#[derive(Default)]
struct BlankLabels {
    labels: HashMap<String, String>,
}

impl BlankLabels {
    fn label(&mut self, id: &str) -> String {
        let next = self.labels.len();
        self.labels
            .entry(id.to_string())
            .or_insert_with(|| format!("_:b{next}"))
            .clone()
    }

    /// Text form of a term: IRIs as-is, blank nodes by stable label, literals by
    /// lexical value.
    #[allow(unreachable_patterns)]
    fn term_object(&mut self, term: Term) -> Option<RawObject> {
        match term {
            Term::NamedNode(node) => Some(RawObject::Iri(node.into_string())),
            Term::BlankNode(node) => Some(RawObject::Iri(self.label(node.as_str()))),
            Term::Literal(literal) => Some(RawObject::Literal(literal.value().to_string())),
            // Quoted triples have no row representation.
            _ => None,
        }
    }
}
