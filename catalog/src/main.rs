//! Catalog Deploy CLI - Turn Catalogs.csv into provisioning XML
//!
//! ```bash
//! catalog-deploy parse Catalogs.csv                       # Decoded records as JSON
//! catalog-deploy xml Catalogs.csv --specs specs.json      # CATALOG blocks
//! catalog-deploy csv Catalogs.csv -o Catalogs.norm.csv    # Normalized CSV
//! ```
//!
//! Settings come from the environment (or `.env`): `CATALOG_DEFAULT_ACG`,
//! `CATALOG_CSV_DELIMITER`. Logging follows `RUST_LOG`.

use catalog_deploy::config::parse_delimiter;
use catalog_deploy::{pipeline, Config, EntitySchema, PipelineResult};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "catalog-deploy")]
#[command(about = "Convert Catalogs.csv rows to normalized CSV or provisioning XML", long_about = None)]
struct Cli {
    /// Outer CSV delimiter (overrides CATALOG_CSV_DELIMITER)
    #[arg(short, long, global = true)]
    delimiter: Option<String>,

    /// Name of the default access control group (overrides CATALOG_DEFAULT_ACG)
    #[arg(long, global = true)]
    default_acg: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a Catalogs file and print the records as JSON
    Parse {
        /// Input Catalogs CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit one CATALOG XML block per row
    Xml {
        /// Input Catalogs CSV file
        input: PathBuf,

        /// JSON file listing specs and their primary key paths
        #[arg(short, long)]
        specs: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-encode a Catalogs file as normalized CSV
    Csv {
        /// Input Catalogs CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| run(cli.command, &config));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> PipelineResult<Config> {
    let mut config = Config::from_env()?;
    if let Some(ref delimiter) = cli.delimiter {
        config.delimiter = parse_delimiter(delimiter)?;
    }
    if let Some(ref acg) = cli.default_acg {
        config.default_acg = acg.clone();
    }
    Ok(config)
}

fn run(command: Commands, config: &Config) -> PipelineResult<()> {
    let schema = EntitySchema::catalog();

    match command {
        Commands::Parse { input, output } => {
            let catalogs = pipeline::decode_file(&input, &schema, config)?;
            let json = serde_json::to_string_pretty(&catalogs)?;
            let mut out = open_output(output.as_deref())?;
            writeln!(out, "{json}")?;
            out.flush()?;
        }

        Commands::Xml {
            input,
            specs,
            output,
        } => {
            let catalogs = pipeline::decode_file(&input, &schema, config)?;
            let cache = pipeline::build_cache(&catalogs, specs.as_deref())?;
            let mut out = open_output(output.as_deref())?;
            let result =
                pipeline::write_xml_document(&catalogs, &schema, &cache, config, &mut out);
            if result.is_err() {
                if let Some(path) = output.as_deref() {
                    drop(out);
                    discard_partial(path);
                }
            }
            let count = result?;
            eprintln!("Wrote {count} catalog(s) as XML");
        }

        Commands::Csv { input, output } => {
            let catalogs = pipeline::decode_file(&input, &schema, config)?;
            let mut out = open_output(output.as_deref())?;
            let count = pipeline::write_csv_document(&catalogs, &schema, config, &mut out)?;
            eprintln!("Wrote {count} catalog row(s)");
        }
    }

    Ok(())
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Remove an output file left half-written by a failed encode.
fn discard_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
    }
}
