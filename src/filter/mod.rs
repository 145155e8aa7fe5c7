//! Triple filter pipeline: rewrite, drop or split raw facts before grouping.
//!
//! Filters form a closed set of variants, each claiming a list of predicates. For one
//! `(predicate, raw value)` pair the pipeline consults the claiming filters in their
//! configured order and stops at the first one with an opinion:
//!
//! - [`FilterOutcome::NoOpinion`]: try the next claiming filter, or fall back to
//!   passing the value through unchanged (as a literal or a link, by its original kind);
//! - [`FilterOutcome::Suppress`]: drop the fact entirely;
//! - [`FilterOutcome::Replace`]: emit the given facts instead, possibly under new
//!   predicate names (the range splitter emits `<predicate>Min` / `<predicate>Max`).

pub mod number;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};
use crate::triple::{Fact, Value};

use self::number::{parse_duration, parse_localized_number, remove_unit, strip_parentheticals};

/// Result of evaluating one filter against one value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// The filter does not handle this value.
    NoOpinion,
    /// The fact is deliberately dropped.
    Suppress,
    /// The fact is replaced by these facts.
    Replace(Vec<Fact>),
}

/// A configured triple filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TripleFilter {
    /// Normalize a localized number (`1.234,5` becomes `1234.5`).
    ParseGermanNumber {
        predicates: Vec<String>,
        #[serde(default = "default_thousands_separator")]
        thousands_separator: String,
        #[serde(default = "default_decimal_separator")]
        decimal_separator: String,
    },
    /// Strip a prefix, parenthetical notes and a trailing unit, then optionally
    /// normalize the remaining number.
    RemoveUnit {
        predicates: Vec<String>,
        unit: String,
        #[serde(default)]
        remove_prefix: Option<String>,
        #[serde(default)]
        remove_thousands_separator: bool,
        #[serde(default)]
        parse_german_number: bool,
        #[serde(default)]
        parse_time: bool,
    },
    /// Drop every fact for the claimed predicates.
    Drop { predicates: Vec<String> },
    /// Drop facts whose raw value is on the block-list.
    IgnoreValues {
        predicates: Vec<String>,
        values: Vec<String>,
    },
    /// Split `a - b` ranges into `<predicate>Min` and `<predicate>Max`.
    SplitRange {
        predicates: Vec<String>,
        #[serde(default)]
        unit: Option<String>,
        #[serde(default = "default_true")]
        parse_german_number: bool,
        #[serde(default)]
        separators: Option<Vec<String>>,
    },
}

fn default_thousands_separator() -> String {
    ".".into()
}
fn default_decimal_separator() -> String {
    ",".into()
}
fn default_true() -> bool {
    true
}

/// Range separators used when a `split_range` filter configures none: the Unicode
/// minus sign (U+2212) and the ASCII hyphen-minus.
pub const DEFAULT_RANGE_SEPARATORS: [&str; 2] = ["\u{2212}", "-"];

impl TripleFilter {
    /// Predicates this filter claims.
    pub fn predicates(&self) -> &[String] {
        match self {
            Self::ParseGermanNumber { predicates, .. }
            | Self::RemoveUnit { predicates, .. }
            | Self::Drop { predicates }
            | Self::IgnoreValues { predicates, .. }
            | Self::SplitRange { predicates, .. } => predicates,
        }
    }

    pub fn claims(&self, predicate: &str) -> bool {
        self.predicates().iter().any(|p| p == predicate)
    }

    /// Short name of the filter kind, as written in configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ParseGermanNumber { .. } => "parse_german_number",
            Self::RemoveUnit { .. } => "remove_unit",
            Self::Drop { .. } => "drop",
            Self::IgnoreValues { .. } => "ignore_values",
            Self::SplitRange { .. } => "split_range",
        }
    }

    /// Evaluate this filter for one value.
    pub fn apply(&self, predicate: &str, raw: &str) -> FilterResult<FilterOutcome> {
        match self {
            Self::ParseGermanNumber {
                thousands_separator,
                decimal_separator,
                ..
            } => {
                let value = localized_number(predicate, raw, thousands_separator, decimal_separator)?;
                Ok(FilterOutcome::Replace(vec![Fact::literal(predicate, value)]))
            }

            Self::RemoveUnit {
                unit,
                remove_prefix,
                remove_thousands_separator,
                parse_german_number,
                parse_time,
                ..
            } => {
                let mut value = raw;
                if let Some(prefix) = remove_prefix {
                    value = value.strip_prefix(prefix.as_str()).unwrap_or(value);
                }
                let value = strip_parentheticals(value);
                let value = remove_unit(&value, unit);

                let value = if *remove_thousands_separator {
                    value.replace('.', "")
                } else if *parse_german_number {
                    localized_number(predicate, value, ".", ",")?
                } else if *parse_time {
                    parse_duration(value)
                        .ok_or_else(|| FilterError::InvalidDuration {
                            predicate: predicate.to_string(),
                            value: raw.to_string(),
                        })?
                        .to_string()
                } else {
                    value.to_string()
                };
                Ok(FilterOutcome::Replace(vec![Fact::literal(predicate, value)]))
            }

            Self::Drop { .. } => Ok(FilterOutcome::Suppress),

            Self::IgnoreValues { values, .. } => {
                if values.iter().any(|v| v == raw) {
                    Ok(FilterOutcome::Suppress)
                } else {
                    Ok(FilterOutcome::NoOpinion)
                }
            }

            Self::SplitRange {
                unit,
                parse_german_number,
                separators,
                ..
            } => split_range(
                predicate,
                raw,
                unit.as_deref(),
                *parse_german_number,
                separators.as_deref(),
            ),
        }
    }
}

fn localized_number(
    predicate: &str,
    raw: &str,
    thousands: &str,
    decimal: &str,
) -> FilterResult<String> {
    parse_localized_number(raw, thousands, decimal).ok_or_else(|| FilterError::InvalidNumber {
        predicate: predicate.to_string(),
        value: raw.to_string(),
    })
}

fn split_range(
    predicate: &str,
    raw: &str,
    unit: Option<&str>,
    numeric: bool,
    separators: Option<&[String]>,
) -> FilterResult<FilterOutcome> {
    // Split on every separator at once so a separator can never be re-split.
    let mut tokens = vec![raw.to_string()];
    let separators: Vec<&str> = match separators {
        Some(custom) => custom.iter().map(String::as_str).collect(),
        None => DEFAULT_RANGE_SEPARATORS.to_vec(),
    };
    for sep in separators.iter().filter(|s| !s.is_empty()) {
        tokens = tokens
            .iter()
            .flat_map(|t| t.split(sep).map(str::to_string).collect::<Vec<_>>())
            .collect();
    }

    let tokens: Vec<&str> = tokens
        .iter()
        .map(|t| t.trim())
        .map(|t| match unit {
            Some(unit) => remove_unit(t, unit),
            None => t,
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Ok(FilterOutcome::NoOpinion);
    }

    let (min, max) = if numeric {
        let mut parsed = tokens
            .iter()
            .map(|t| {
                let text = localized_number(predicate, t, ".", ",")?;
                let number: f64 = text.parse().map_err(|_| FilterError::InvalidNumber {
                    predicate: predicate.to_string(),
                    value: raw.to_string(),
                })?;
                Ok((number, text))
            })
            .collect::<FilterResult<Vec<(f64, String)>>>()?;
        parsed.sort_by(|a, b| a.0.total_cmp(&b.0));
        let min = parsed[0].1.clone();
        let max = parsed[parsed.len() - 1].1.clone();
        (min, max)
    } else {
        let mut sorted: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        sorted.sort();
        (sorted[0].clone(), sorted[sorted.len() - 1].clone())
    };

    Ok(FilterOutcome::Replace(vec![
        Fact::literal(format!("{predicate}Min"), min),
        Fact::literal(format!("{predicate}Max"), max),
    ]))
}

/// Ordered list of filters consulted for every processed triple.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    filters: Vec<TripleFilter>,
}

impl FilterPipeline {
    pub fn new(filters: Vec<TripleFilter>) -> Self {
        Self { filters }
    }

    pub fn filters(&self) -> &[TripleFilter] {
        &self.filters
    }

    /// Process one fact. `original` is the passthrough value used when no claiming
    /// filter has an opinion; its text is what the filters see.
    pub fn process(&self, predicate: &str, original: Value) -> FilterResult<Vec<Fact>> {
        let raw = match &original {
            Value::Literal(s) | Value::Link(s) => s.as_str(),
        };

        for filter in self.filters.iter().filter(|f| f.claims(predicate)) {
            match filter.apply(predicate, raw)? {
                FilterOutcome::NoOpinion => continue,
                FilterOutcome::Suppress => {
                    tracing::trace!(predicate, kind = filter.kind(), "fact suppressed");
                    return Ok(Vec::new());
                }
                FilterOutcome::Replace(facts) => return Ok(facts),
            }
        }

        Ok(vec![Fact::new(predicate, original)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(p: &str, v: &str) -> Fact {
        Fact::literal(p, v)
    }

    #[test]
    fn passthrough_keeps_kind() {
        let pipeline = FilterPipeline::default();
        let facts = pipeline
            .process("knows", Value::Link("bob".into()))
            .unwrap();
        assert_eq!(facts, vec![Fact::new("knows", Value::Link("bob".into()))]);
    }

    #[test]
    fn german_number_filter() {
        let filter = TripleFilter::ParseGermanNumber {
            predicates: vec!["price".into()],
            thousands_separator: ".".into(),
            decimal_separator: ",".into(),
        };
        let outcome = filter.apply("price", "12.345,6").unwrap();
        assert_eq!(outcome, FilterOutcome::Replace(vec![lit("price", "12345.6")]));
    }

    #[test]
    fn german_number_filter_rejects_text() {
        let filter = TripleFilter::ParseGermanNumber {
            predicates: vec!["price".into()],
            thousands_separator: ".".into(),
            decimal_separator: ",".into(),
        };
        assert!(matches!(
            filter.apply("price", "n/a"),
            Err(FilterError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn remove_unit_with_prefix_and_notes() {
        let filter = TripleFilter::RemoveUnit {
            predicates: vec!["power".into()],
            unit: "kW".into(),
            remove_prefix: Some("ca. ".into()),
            remove_thousands_separator: false,
            parse_german_number: true,
            parse_time: false,
        };
        let outcome = filter.apply("power", "ca. 1.250,5 kw (peak)").unwrap();
        assert_eq!(outcome, FilterOutcome::Replace(vec![lit("power", "1250.5")]));
    }

    #[test]
    fn remove_unit_thousands_mode() {
        let filter = TripleFilter::RemoveUnit {
            predicates: vec!["weight".into()],
            unit: "kg".into(),
            remove_prefix: None,
            remove_thousands_separator: true,
            parse_german_number: false,
            parse_time: false,
        };
        let outcome = filter.apply("weight", "1.500 kg").unwrap();
        assert_eq!(outcome, FilterOutcome::Replace(vec![lit("weight", "1500")]));
    }

    #[test]
    fn remove_unit_time_mode() {
        let filter = TripleFilter::RemoveUnit {
            predicates: vec!["charge".into()],
            unit: "h".into(),
            remove_prefix: None,
            remove_thousands_separator: false,
            parse_german_number: false,
            parse_time: true,
        };
        let outcome = filter.apply("charge", "2:30 h").unwrap();
        assert_eq!(outcome, FilterOutcome::Replace(vec![lit("charge", "150")]));
    }

    #[test]
    fn split_range_default_separators() {
        let filter = TripleFilter::SplitRange {
            predicates: vec!["range".into()],
            unit: Some("km".into()),
            parse_german_number: true,
            separators: None,
        };
        let outcome = filter.apply("range", "450 km \u{2212} 380 km").unwrap();
        assert_eq!(
            outcome,
            FilterOutcome::Replace(vec![lit("rangeMin", "380"), lit("rangeMax", "450")])
        );
    }

    #[test]
    fn split_range_single_token() {
        let filter = TripleFilter::SplitRange {
            predicates: vec!["range".into()],
            unit: None,
            parse_german_number: true,
            separators: None,
        };
        let outcome = filter.apply("range", "12,5").unwrap();
        assert_eq!(
            outcome,
            FilterOutcome::Replace(vec![lit("rangeMin", "12.5"), lit("rangeMax", "12.5")])
        );
    }

    #[test]
    fn split_range_sorts_numerically_and_uses_extremes() {
        let filter = TripleFilter::SplitRange {
            predicates: vec!["r".into()],
            unit: None,
            parse_german_number: true,
            separators: Some(vec!["/".into()]),
        };
        let outcome = filter.apply("r", "9 / 100 / 20").unwrap();
        assert_eq!(
            outcome,
            FilterOutcome::Replace(vec![lit("rMin", "9"), lit("rMax", "100")])
        );
    }

    #[test]
    fn split_range_lexical() {
        let filter = TripleFilter::SplitRange {
            predicates: vec!["grade".into()],
            unit: None,
            parse_german_number: false,
            separators: None,
        };
        let outcome = filter.apply("grade", "C-A").unwrap();
        assert_eq!(
            outcome,
            FilterOutcome::Replace(vec![lit("gradeMin", "A"), lit("gradeMax", "C")])
        );
    }

    #[test]
    fn ignore_values_only_blocks_listed_values() {
        let filter = TripleFilter::IgnoreValues {
            predicates: vec!["price".into()],
            values: vec!["unknown".into()],
        };
        assert_eq!(filter.apply("price", "unknown").unwrap(), FilterOutcome::Suppress);
        assert_eq!(filter.apply("price", "12").unwrap(), FilterOutcome::NoOpinion);
    }

    #[test]
    fn first_opinion_wins() {
        let pipeline = FilterPipeline::new(vec![
            TripleFilter::IgnoreValues {
                predicates: vec!["price".into()],
                values: vec!["unknown".into()],
            },
            TripleFilter::Drop {
                predicates: vec!["price".into()],
            },
            TripleFilter::ParseGermanNumber {
                predicates: vec!["price".into()],
                thousands_separator: ".".into(),
                decimal_separator: ",".into(),
            },
        ]);
        // ignore_values has no opinion on "12", drop is consulted next and wins.
        let facts = pipeline
            .process("price", Value::Literal("12".into()))
            .unwrap();
        assert!(facts.is_empty());
    }

    #[test]
    fn suppression_shadows_later_filters() {
        let pipeline = FilterPipeline::new(vec![
            TripleFilter::IgnoreValues {
                predicates: vec!["price".into()],
                values: vec!["n/a".into()],
            },
            TripleFilter::ParseGermanNumber {
                predicates: vec!["price".into()],
                thousands_separator: ".".into(),
                decimal_separator: ",".into(),
            },
        ]);
        // The number filter would fail on "n/a"; it must never be consulted.
        let facts = pipeline
            .process("price", Value::Literal("n/a".into()))
            .unwrap();
        assert!(facts.is_empty());

        let facts = pipeline
            .process("price", Value::Literal("1,5".into()))
            .unwrap();
        assert_eq!(facts, vec![lit("price", "1.5")]);
    }

    #[test]
    fn unclaimed_predicates_pass_through() {
        let pipeline = FilterPipeline::new(vec![TripleFilter::Drop {
            predicates: vec!["internal".into()],
        }]);
        let facts = pipeline
            .process("name", Value::Literal("Ada".into()))
            .unwrap();
        assert_eq!(facts, vec![lit("name", "Ada")]);
    }

    #[test]
    fn filters_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            triple_filters: Vec<TripleFilter>,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
            [[triple_filters]]
            type = "split_range"
            predicates = ["range"]
            unit = "km"

            [[triple_filters]]
            type = "drop"
            predicates = ["comment"]
            "#,
        )
        .unwrap();
        assert_eq!(parsed.triple_filters.len(), 2);
        assert!(matches!(
            &parsed.triple_filters[0],
            TripleFilter::SplitRange { parse_german_number: true, separators: None, .. }
        ));
        assert_eq!(parsed.triple_filters[1].kind(), "drop");
    }
}
