//! kg2sql CLI: relational schema induction for knowledge graphs.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use kg2sql::config::ConversionConfig;
use kg2sql::export::SchemaExport;
use kg2sql::induce::{InducedSchema, induce};
use kg2sql::persist::{Persister, SqlitePersister, create_table_statement};
use kg2sql::preview::{DEFAULT_MAX_COLUMN_WIDTH, render_table};
use kg2sql::rdf;

#[derive(Parser)]
#[command(
    name = "kg2sql",
    version,
    about = "Induce a relational schema from a knowledge graph"
)]
struct Cli {
    /// Only log warnings and errors.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a graph.
#[derive(clap::Args)]
struct InputArgs {
    /// Graph file (Turtle, N-Triples, N-Quads, TriG, N3 or RDF/XML).
    #[arg(long, short)]
    input: PathBuf,

    /// TOML conversion config.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Graph format; guessed from the file extension when omitted.
    #[arg(long)]
    format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a graph into a new SQLite database.
    Convert {
        #[command(flatten)]
        input: InputArgs,

        /// Database file to create.
        #[arg(long, short)]
        output: PathBuf,

        /// Replace the output database if it exists.
        #[arg(long)]
        overwrite: bool,

        /// Print a preview of every table before writing.
        #[arg(long)]
        preview: bool,
    },

    /// Print the induced CREATE TABLE statements without writing anything.
    Schema {
        #[command(flatten)]
        input: InputArgs,

        /// Print a preview of every table's rows.
        #[arg(long)]
        preview: bool,

        /// Maximum characters per preview cell.
        #[arg(long, default_value_t = DEFAULT_MAX_COLUMN_WIDTH)]
        max_column_width: usize,
    },

    /// Print the induced tables and rows as JSON.
    Export {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            overwrite,
            preview,
        } => {
            let schema = load_and_induce(&input)?;
            if preview {
                print_schema(&schema, true, DEFAULT_MAX_COLUMN_WIDTH);
            }
            let stats = SqlitePersister::new(&output)
                .overwrite(overwrite)
                .persist(&schema.tables)?;
            println!(
                "Wrote {} tables ({} rows) to {}",
                stats.tables,
                stats.rows,
                output.display()
            );
        }

        Commands::Schema {
            input,
            preview,
            max_column_width,
        } => {
            let schema = load_and_induce(&input)?;
            print_schema(&schema, preview, max_column_width);
        }

        Commands::Export { input } => {
            let schema = load_and_induce(&input)?;
            let export = SchemaExport::from_schema(&schema);
            let json = serde_json::to_string_pretty(&export).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ConversionConfig> {
    match path {
        Some(path) => Ok(ConversionConfig::load(path)?),
        None => Ok(ConversionConfig::default()),
    }
}

fn load_and_induce(args: &InputArgs) -> Result<InducedSchema> {
    let config = load_config(args.config.as_deref())?;
    let format = args
        .format
        .as_deref()
        .map(rdf::format_from_name)
        .transpose()?;
    let triples = rdf::load_triples(&args.input, format)?;
    Ok(induce(&triples, &config)?)
}

fn print_schema(schema: &InducedSchema, preview: bool, max_column_width: usize) {
    for relation in &schema.relations {
        println!(
            "-- {} {} {} ({})",
            relation.type_a, relation.predicate, relation.type_b, relation.cardinality
        );
    }
    if !schema.relations.is_empty() {
        println!();
    }
    for table in &schema.tables {
        println!("{};", create_table_statement(table));
        if preview {
            println!("{}", render_table(table, max_column_width));
        }
        println!();
    }
}
