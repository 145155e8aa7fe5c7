//! Name derivation for predicates, key columns and relation columns.

/// Local name of the type-assignment predicate (`rdf:type`).
pub const TYPE_PREDICATE: &str = "22-rdf-syntax-ns#type";

/// Local name of `rdfs:label`, which is renamed to [`LABEL_FIELD`].
pub const LABEL_PREDICATE: &str = "rdf-schema#label";

pub const LABEL_FIELD: &str = "label";

/// Normalize a predicate IRI to its local name: the last non-empty path segment.
pub fn predicate_name(predicate: &str) -> String {
    let trimmed = predicate.trim_end_matches('/');
    let local = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if local == LABEL_PREDICATE {
        LABEL_FIELD.to_string()
    } else {
        local.to_string()
    }
}

/// Title-case a word: a letter following a non-letter is uppercased, any other
/// letter lowercased.
fn title(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_cased = false;
    for ch in word.chars() {
        if prev_cased {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_cased = ch.is_alphabetic();
    }
    out
}

fn lowercase_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn uppercase_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `snake_case` or `TypeName` to `camelCase`: the first word keeps its letters but
/// starts lowercase, later words are title-cased.
pub fn to_camel_case(value: &str) -> String {
    let mut parts = value.split('_');
    let head = lowercase_first(parts.next().unwrap_or_default());
    parts.fold(head, |mut acc, part| {
        acc.push_str(&title(part));
        acc
    })
}

pub fn to_upper_camel_case(value: &str) -> String {
    uppercase_first(&to_camel_case(value))
}

/// Primary-key column of a type's table, e.g. `Person` gets `personId`.
pub fn table_key_name(table: &str) -> String {
    format!("{}Id", to_camel_case(table))
}

/// Default relation column, e.g. `Article` referencing `Person` gets `articleToPerson`.
pub fn relation_column_name(holder: &str, referenced: &str) -> String {
    format!("{}To{}", to_camel_case(holder), to_upper_camel_case(referenced))
}

/// Junction table for a many-to-many relation.
pub fn junction_table_name(type_a: &str, type_b: &str) -> String {
    format!("{type_a}_to_{type_b}")
}
