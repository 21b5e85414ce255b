//! ConversQL command line interface.
//!
//! Compiles natural-language requests against a schema catalog file and
//! prints the resulting plan without executing anything.
//!
//! # Usage
//!
//! ```bash
//! # Compile a request
//! conversql compile --schema plugin_schema.json --role science "show all stars"
//!
//! # Inspect the loaded catalog
//! conversql schema --schema plugin_schema.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use conversql::audit::TracingAuditSink;
use conversql::pipeline::{CompilerConfig, QueryCompiler};
use conversql::rbac::RolePolicy;
use conversql::schema::{SchemaCatalog, SchemaMap};

#[derive(Parser)]
#[command(name = "conversql")]
#[command(version = "0.1.0")]
#[command(about = "Compile natural-language requests into guarded SQL plans")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Schema catalog JSON file
    #[arg(long, short = 's', global = true, env = "CONVERSQL_SCHEMA")]
    schema: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a request and print the plan
    Compile {
        /// The natural-language request
        text: String,

        /// Caller's role for the access gate
        #[arg(long, short, default_value = "admin")]
        role: String,

        /// Caller name recorded in the audit trail
        #[arg(long, default_value = "cli")]
        caller: String,

        /// Disable fuzzy schema matching
        #[arg(long)]
        no_fuzzy: bool,
    },

    /// List the databases, tables and columns of the catalog
    Schema,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let schema_path = cli
        .schema
        .clone()
        .context("no schema catalog given; pass --schema or set CONVERSQL_SCHEMA")?;
    let catalog = SchemaCatalog::from_path(&schema_path)
        .with_context(|| format!("loading catalog from {}", schema_path.display()))?;
    let schema = Arc::new(SchemaMap::build(&catalog));

    match cli.command {
        Commands::Compile {
            text,
            role,
            caller,
            no_fuzzy,
        } => {
            let config = CompilerConfig {
                fuzzy_matching: !no_fuzzy,
                ..CompilerConfig::default()
            };
            let compiler = QueryCompiler::new(schema, RolePolicy::default(), config);
            let outcome = compiler.compile_audited(&text, &caller, &role, &TracingAuditSink);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                OutputFormat::Pretty => {
                    println!("plan: {}", outcome.plan.sql);
                    println!(
                        "target: {}",
                        outcome.plan.target_database.as_deref().unwrap_or("-")
                    );
                    let intents: Vec<String> =
                        outcome.intents.iter().map(|i| i.tag().to_string()).collect();
                    println!("intents: {}", intents.join(", "));
                    for warning in &outcome.plan.warnings {
                        println!("warning: {warning}");
                    }
                    if let Some(reason) = &outcome.denied_reason {
                        println!("denied: {reason}");
                    }
                }
            }

            if outcome.is_executable() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Schema => {
            match cli.format {
                OutputFormat::Json => println!("{}", catalog.to_json_pretty()?),
                OutputFormat::Pretty => {
                    for db in &catalog.databases {
                        println!("{}", db.name);
                        for table in &db.tables {
                            println!("  {} ({})", table.name, table.columns.join(", "));
                        }
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
