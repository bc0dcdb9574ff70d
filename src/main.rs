use anyhow::Context;
use cellbind::cli::{self, ConvertOptions, RawKind};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cellbind")]
#[command(about = "Convert spreadsheet cell values to typed values and back")]
#[command(long_about = "Cellbind - typed spreadsheet cell binding

Reads a raw cell value the way a spreadsheet mapper would, using the
conversion policy (culture, number/date styles, boolean tokens) of a column.

COMMANDS:
  convert - Convert one raw value into a typed value and back
  types   - List registered converters

EXAMPLES:
  cellbind convert int \"1,234\" --culture en-US
  cellbind convert datetime 45356.5 --as number
  cellbind convert bool? \"\" --as empty
  cellbind convert Status active --config binding.yaml
  cellbind convert bool 1 --config binding.yaml --map Invoice --column paid

Set RUST_LOG=cellbind=trace to see conversion fallbacks.")]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Convert one raw value into a typed value and back.

TYPE accepts built-in names and aliases (int, i32, decimal, datetime, guid, ...),
nullable forms (int?, Option<int>), sequences (string[]) and enums declared
in the --config file.

The policy is merged from the configuration: defaults, then the --map
defaults, then the --column overrides. --culture wins over all of them.")]
    /// Convert a raw cell value to a typed value
    Convert {
        /// Target type, e.g. int, decimal?, datetime, Status
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Raw value (ignored with --as empty)
        #[arg(default_value = "")]
        value: String,

        /// Raw cell kind
        #[arg(long = "as", value_enum, default_value_t = RawKind::Text)]
        raw_kind: RawKind,

        /// Culture for parsing, e.g. de-DE
        #[arg(long)]
        culture: Option<String>,

        /// Binding configuration (YAML)
        #[arg(short, long, env = "CELLBIND_CONFIG")]
        config: Option<PathBuf>,

        /// Class map in the configuration
        #[arg(short, long)]
        map: Option<String>,

        /// Column within the map
        #[arg(long, requires = "map")]
        column: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered converters
    Types {
        /// Binding configuration whose enums should be listed too
        #[arg(short, long, env = "CELLBIND_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "cellbind=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Cli) -> anyhow::Result<()> {
    match args.command {
        Commands::Convert {
            type_name,
            value,
            raw_kind,
            culture,
            config,
            map,
            column,
            json,
        } => {
            let options = ConvertOptions {
                type_name: type_name.clone(),
                value,
                raw_kind,
                culture,
                config,
                map,
                column,
            };
            cli::convert(options, json).with_context(|| format!("cannot convert to {}", type_name))
        }

        Commands::Types { config } => cli::types(config).context("cannot list converters"),
    }
}
