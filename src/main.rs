//! sbom-consistency: cross-tool SBOM consistency auditor
//!
//! Measures how consistently different SBOM generators describe the same
//! repository, for `CycloneDX` and SPDX documents.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use sbom_consistency::{
    aggregate::AggregationPolicy,
    cli::{self, CompareFormat, MatchPaths},
    config::{self, AppConfig, ConfigOverrides},
    matching::VersionRangeMode,
    model::Standard,
    pipeline::exit_codes,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-consistency")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Cross-tool SBOM consistency auditor", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    3  Error occurred

EXAMPLES:
    # Canonicalize raw SBOMs listed in files.txt
    sbom-consistency extract files.txt raw/ extracted/

    # Score every repository and tool pair
    sbom-consistency match extracted/ repos.txt matched/

    # Inspect a single comparison
    sbom-consistency compare extracted/cdx#syft#acme.json extracted/cdx#cdxgen#acme.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Engine flags shared by `match` and `compare`
#[derive(Parser)]
struct EngineArgs {
    /// How fields empty on both sides enter the means
    #[arg(long)]
    aggregation: Option<AggregationPolicy>,

    /// Skip file matching above this many files per document
    #[arg(long)]
    max_files: Option<usize>,

    /// Handling of version strings with range operators
    #[arg(long)]
    version_ranges: Option<VersionRangeMode>,
}

/// Arguments for the `extract` subcommand
#[derive(Parser)]
struct ExtractArgs {
    /// File listing raw SBOM file names, one per line
    list: PathBuf,

    /// Directory holding the raw SBOMs
    input_dir: PathBuf,

    /// Directory receiving canonical documents
    output_dir: PathBuf,
}

/// Arguments for the `match` subcommand
#[derive(Parser)]
struct MatchArgs {
    /// Directory of canonical documents
    extracted_dir: PathBuf,

    /// File listing repository names, one per line
    repositories: PathBuf,

    /// Directory receiving the output tables
    output_dir: PathBuf,

    /// Only run one standard (default: both)
    #[arg(short, long)]
    standard: Option<Standard>,

    /// Evaluate units one at a time
    #[arg(long)]
    sequential: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

/// Arguments for the `compare` subcommand
#[derive(Parser)]
struct CompareArgs {
    /// Canonical document of the first tool
    left: PathBuf,

    /// Canonical document of the second tool
    right: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "summary")]
    output: CompareFormat,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert raw SBOMs into canonical documents
    Extract(ExtractArgs),

    /// Score every repository across every tool pair
    Match(MatchArgs),

    /// Score one repository between two tools
    Compare(CompareArgs),

    /// Show or generate configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print a commented example config file
    Example,
    /// Print the JSON Schema of the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&std::path::Path>, overrides: &ConfigOverrides) -> Result<AppConfig> {
    let (mut config, loaded_from) =
        config::load_or_default(path).context("failed to load configuration")?;
    if let Some(path) = loaded_from {
        tracing::debug!("Loaded configuration from {}", path.display());
    }
    config.merge(overrides);
    Ok(config)
}

fn engine_overrides(engine: &EngineArgs, sequential: bool) -> ConfigOverrides {
    ConfigOverrides {
        max_files: engine.max_files,
        aggregation: engine.aggregation,
        version_ranges: engine.version_ranges,
        sequential,
    }
}

fn run(cli: Cli) -> Result<i32> {
    let no_color = cli.no_color || std::env::var_os("NO_COLOR").is_some();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Extract(args) => {
            cli::run_extract(&args.list, &args.input_dir, &args.output_dir, cli.quiet)
        }

        Commands::Match(args) => {
            let config = load_config(config_path, &engine_overrides(&args.engine, args.sequential))?;
            let standards = args
                .standard
                .map_or_else(|| Standard::all().to_vec(), |s| vec![s]);
            let paths = MatchPaths {
                extracted_dir: args.extracted_dir,
                repositories: args.repositories,
                output_dir: args.output_dir,
            };
            cli::run_match(&paths, &standards, &config, cli.quiet)
        }

        Commands::Compare(args) => {
            let config = load_config(config_path, &engine_overrides(&args.engine, false))?;
            cli::run_compare(&args.left, &args.right, args.output, &config, no_color)
        }

        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let (config, loaded_from) = config::load_or_default(config_path)
                        .context("failed to load configuration")?;
                    if let Some(path) = &loaded_from {
                        eprintln!("# Loaded from: {}", path.display());
                    } else {
                        eprintln!("# No config file found; showing defaults");
                    }
                    let yaml =
                        serde_yaml::to_string(&config).context("failed to serialize config")?;
                    print!("{yaml}");
                }
                ConfigAction::Example => print!("{}", config::generate_example_config()),
                ConfigAction::Schema { output } => {
                    let schema = config::generate_json_schema();
                    match output {
                        Some(path) => {
                            std::fs::write(&path, &schema)
                                .with_context(|| format!("failed to write {}", path.display()))?;
                            eprintln!("Schema written to {}", path.display());
                        }
                        None => println!("{schema}"),
                    }
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-consistency", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(exit_code);
}
