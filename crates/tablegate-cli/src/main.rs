use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Outcome, Settings};

#[derive(Parser, Debug)]
#[command(name = "tablegate", version, about = "Table-scoped query authorization checks")]
struct Cli {
    /// Gateway settings file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Table filter file; overrides the one named in --config
    #[arg(long = "filter-file", global = true, env = "PINOT_TABLE_FILTER_FILE")]
    filter_file: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the table filter and print the effective policy
    CheckConfig,

    /// Extract the tables a query references and authorize them
    Query {
        /// SQL text, or "-" to read it from stdin
        sql: String,
    },

    /// Authorize a metadata operation on one table
    Table { name: String },

    /// Authorize an operation on one schema
    Schema { name: String },

    /// Print the names a table listing would keep
    Filter {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Classify and authorize an MCP tool call
    Tool {
        /// Tool name, e.g. read-query
        name: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let settings = Settings {
        config: cli.config,
        filter_file: cli.filter_file,
        json: cli.json,
    };

    match cli.cmd {
        Command::CheckConfig => commands::check::run(&settings),
        Command::Query { sql } => commands::access::query(&settings, &sql),
        Command::Table { name } => commands::access::table(&settings, &name),
        Command::Schema { name } => commands::access::schema(&settings, &name),
        Command::Filter { names } => commands::filter::run(&settings, &names),
        Command::Tool { name, args } => commands::tool::run(&settings, &name, &args),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
