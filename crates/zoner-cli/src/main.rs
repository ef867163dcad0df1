mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "zoner",
    version,
    about = "Spatial segmentation of invoice extraction output into classified chunks"
)]
struct Cli {
    /// Log engine decisions (debug level) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment an extraction JSON file into classified chunks
    Chunk {
        /// Path to the extractor's JSON output
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Segmenter config JSON file (defaults apply for missing fields)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Chunking mode: region or page (overrides the config)
        #[arg(short, long)]
        mode: Option<String>,

        /// Keep adjacent chunks separate
        #[arg(long)]
        no_merge: bool,
    },
    /// Reconstruct the line-item table of an extraction JSON file
    Table {
        /// Path to the extractor's JSON output
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Segmenter config JSON file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Inspect and validate segmenter configs
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the default config as JSON
    Show,
    /// Validate a config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Chunk {
            input_file,
            output,
            config,
            mode,
            no_merge,
        } => commands::chunk::run(input_file, &output, config, mode.as_deref(), no_merge),
        Commands::Table {
            input_file,
            output,
            config,
        } => commands::table::run(input_file, &output, config),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
