//! End-to-end induction tests: triples and config in, finalized tables out.

use kg2sql::config::ConversionConfig;
use kg2sql::error::{InductionError, Kg2SqlError};
use kg2sql::induce::{Cardinality, InducedSchema, induce};
use kg2sql::persist::{MemoryPersister, Persister, create_table_statement};
use kg2sql::schema::{CellValue, ForeignKey, SqlType, Table};
use kg2sql::triple::RawTriple;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
const EX: &str = "http://example.org/";

fn ex(local: &str) -> String {
    format!("{EX}{local}")
}

fn typed(subject: &str, type_name: &str) -> RawTriple {
    RawTriple::link(ex(subject), RDF_TYPE, ex(type_name))
}

fn lit(subject: &str, predicate: &str, value: &str) -> RawTriple {
    RawTriple::literal(ex(subject), ex(predicate), value)
}

fn link(subject: &str, predicate: &str, target: &str) -> RawTriple {
    RawTriple::link(ex(subject), ex(predicate), ex(target))
}

fn stripped() -> ConversionConfig {
    ConversionConfig {
        strip_uri_prefixes: vec![EX.into()],
        ..Default::default()
    }
}

fn cell<'a>(table: &'a Table, row: &str, field: &str) -> Option<&'a CellValue> {
    table.rows.get(row)?.get(field)
}

fn library() -> Vec<RawTriple> {
    vec![
        typed("e1", "Person"),
        typed("e2", "Article"),
        typed("e3", "Article"),
        RawTriple::literal(ex("e1"), RDFS_LABEL, "Ada"),
        lit("e1", "born", "1815"),
        lit("e2", "title", "Notes"),
        lit("e3", "title", "Sketch"),
        lit("e2", "pages", "12"),
        lit("e3", "pages", "7,5"),
        link("e1", "hasWritten", "e2"),
        link("e1", "hasWritten", "e3"),
    ]
}

#[test]
fn writer_of_many_articles_gets_key_on_article() {
    let schema = induce(&library(), &stripped()).unwrap();

    assert_eq!(schema.relations.len(), 1);
    let relation = &schema.relations[0];
    assert_eq!(relation.cardinality, Cardinality::OneToMany);
    assert_eq!(
        (relation.type_a.as_str(), relation.predicate.as_str(), relation.type_b.as_str()),
        ("Person", "hasWritten", "Article")
    );

    let article = schema.table("Article").unwrap();
    let field = article.fields.get("articleToPerson").unwrap();
    assert!(field.nullable);
    assert_eq!(
        article.foreign_keys,
        vec![ForeignKey {
            field: "articleToPerson".into(),
            referenced_table: "Person".into(),
            referenced_key: "personId".into(),
        }]
    );
    for row in ["e2", "e3"] {
        assert_eq!(
            cell(article, row, "articleToPerson"),
            Some(&CellValue::from("e1"))
        );
    }

    let person = schema.table("Person").unwrap();
    assert!(!person.fields.contains_key("articleToPerson"));
    assert!(person.foreign_keys.is_empty());
    assert_eq!(cell(person, "e1", "label"), Some(&CellValue::from("Ada")));
}

#[test]
fn column_types_are_inferred() {
    let schema = induce(&library(), &stripped()).unwrap();

    let person = schema.table("Person").unwrap();
    assert_eq!(person.fields.get("born").unwrap().sql_type, SqlType::Integer);
    assert_eq!(cell(person, "e1", "born"), Some(&CellValue::Integer(1815)));

    // "7,5" is not a plain number without a filter.
    let article = schema.table("Article").unwrap();
    assert_eq!(article.fields.get("pages").unwrap().sql_type, SqlType::Text);
    assert_eq!(article.fields.get("title").unwrap().sql_type, SqlType::Text);
    assert!(!article.fields.get("title").unwrap().nullable);
}

#[test]
fn localized_numbers_become_real_columns() {
    let config = ConversionConfig::from_toml_str(&format!(
        r#"
        strip_uri_prefixes = ["{EX}"]

        [[triple_filters]]
        type = "parse_german_number"
        predicates = ["pages"]
        "#
    ))
    .unwrap();
    let schema = induce(&library(), &config).unwrap();

    let article = schema.table("Article").unwrap();
    assert_eq!(article.fields.get("pages").unwrap().sql_type, SqlType::Real);
    assert_eq!(cell(article, "e3", "pages"), Some(&CellValue::Real(7.5)));
    assert_eq!(cell(article, "e2", "pages"), Some(&CellValue::Real(12.0)));
}

#[test]
fn first_filter_claiming_a_predicate_wins() {
    let config = ConversionConfig::from_toml_str(&format!(
        r#"
        strip_uri_prefixes = ["{EX}"]

        [[triple_filters]]
        type = "ignore_values"
        predicates = ["range"]
        values = ["n/a"]

        [[triple_filters]]
        type = "split_range"
        predicates = ["range"]
        unit = "km"

        [[triple_filters]]
        type = "drop"
        predicates = ["range"]
        "#
    ))
    .unwrap();
    let triples = vec![
        typed("c1", "Car"),
        typed("c2", "Car"),
        lit("c1", "range", "300 - 450 km"),
        lit("c2", "range", "n/a"),
    ];
    let schema = induce(&triples, &config).unwrap();

    let car = schema.table("Car").unwrap();
    assert_eq!(
        car.fields.keys().collect::<Vec<_>>(),
        vec!["rangeMin", "rangeMax"]
    );
    assert_eq!(cell(car, "c1", "rangeMin"), Some(&CellValue::Integer(300)));
    assert_eq!(cell(car, "c1", "rangeMax"), Some(&CellValue::Integer(450)));
    assert!(cell(car, "c2", "rangeMin").is_none());
    assert!(car.fields.get("rangeMin").unwrap().nullable);
}

#[test]
fn shuffled_input_yields_identical_output() {
    let mut triples = library();
    triples.extend([
        typed("t1", "Tag"),
        typed("t2", "Tag"),
        link("e2", "tagged", "t1"),
        link("e2", "tagged", "t2"),
        link("e3", "tagged", "t1"),
    ]);
    let forward = induce(&triples, &stripped()).unwrap();

    triples.reverse();
    triples.swap(0, 5);
    triples.swap(2, 9);
    let shuffled = induce(&triples, &stripped()).unwrap();

    assert_eq!(forward, shuffled);

    let mut a = MemoryPersister::default();
    let mut b = MemoryPersister::default();
    a.persist(&forward.tables).unwrap();
    b.persist(&shuffled.tables).unwrap();
    assert_eq!(a.creates, b.creates);
    assert_eq!(a.inserts, b.inserts);
}

#[test]
fn junction_has_one_row_per_distinct_edge() {
    let triples = vec![
        typed("a1", "Article"),
        typed("a2", "Article"),
        typed("t1", "Tag"),
        typed("t2", "Tag"),
        link("a1", "tagged", "t1"),
        link("a1", "tagged", "t2"),
        link("a2", "tagged", "t1"),
        link("a2", "tagged", "t2"),
        // Duplicate edge.
        link("a2", "tagged", "t2"),
    ];
    let schema = induce(&triples, &stripped()).unwrap();

    assert_eq!(schema.relations[0].cardinality, Cardinality::ManyToMany);
    let junction = schema.table("Article_to_Tag").unwrap();
    assert_eq!(junction.primary_key, None);
    assert_eq!(junction.row_count(), 4);
    assert_eq!(
        create_table_statement(junction),
        "CREATE TABLE Article_to_Tag (\n\
         \tarticleId TEXT NOT NULL,\n\
         \ttagId TEXT NOT NULL,\n\
         \tFOREIGN KEY (articleId) REFERENCES Article(articleId),\n\
         \tFOREIGN KEY (tagId) REFERENCES Tag(tagId)\n\
         )"
    );

    // Junction tables come after every entity table.
    let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names.last(), Some(&"Article_to_Tag"));
}

#[test]
fn mixed_literal_and_link_field_aborts() {
    let triples = vec![
        typed("p1", "Part"),
        typed("p2", "Part"),
        typed("x", "Code"),
        lit("p1", "code", "A-17"),
        link("p2", "code", "x"),
    ];
    let err = induce(&triples, &stripped()).unwrap_err();
    assert!(matches!(
        err,
        Kg2SqlError::Induction(InductionError::MixedField { ref predicate, .. }) if predicate == "code"
    ));
}

#[test]
fn config_postprocessing_is_applied() {
    let config = ConversionConfig::from_toml_str(&format!(
        r#"
        strip_uri_prefixes = ["{EX}"]
        ignore_tables = ["Tag"]

        [table_aliases]
        Person = "Author"

        [relation_key_aliases]
        articleToAuthor = "writer"

        [table_field_aliases.Author]
        label = "name"

        [table_field_comments.Article]
        writer = "who wrote it"

        [ignore_table_fields]
        Article = ["pages"]
        "#
    ))
    .unwrap();
    let mut triples = library();
    triples.push(typed("t1", "Tag"));
    let schema: InducedSchema = induce(&triples, &config).unwrap();

    assert!(schema.table("Tag").is_none());
    assert!(schema.table("Person").is_none());

    let author = schema.table("Author").unwrap();
    assert_eq!(author.primary_key.as_deref(), Some("authorId"));
    assert_eq!(cell(author, "e1", "name"), Some(&CellValue::from("Ada")));

    let article = schema.table("Article").unwrap();
    assert!(!article.fields.contains_key("pages"));
    assert!(cell(article, "e2", "pages").is_none());
    let writer = article.fields.get("writer").unwrap();
    assert_eq!(writer.comment.as_deref(), Some("who wrote it"));
    assert_eq!(article.foreign_keys[0].referenced_table, "Author");
    assert!(create_table_statement(article).contains("\twriter TEXT, -- who wrote it\n"));
}

#[test]
fn unknown_postprocess_table_is_fatal() {
    let config = ConversionConfig {
        ignore_tables: vec!["Nope".into()],
        ..stripped()
    };
    let err = induce(&library(), &config).unwrap_err();
    assert!(matches!(err, Kg2SqlError::Postprocess(_)));
}

#[test]
fn empty_input_yields_no_tables() {
    let schema = induce(&[], &ConversionConfig::default()).unwrap();
    assert!(schema.tables.is_empty());
    assert!(schema.relations.is_empty());
}
