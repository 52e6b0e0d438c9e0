//! Slidershow CLI: build presentation pages from annotated spreadsheets.
//!
//! Usage:
//!   slidershow build <FILE>          Build pages from a workbook
//!   slidershow compile <DIRECTIVE>   Compile one row of directives
//!   slidershow cache                 List converted media in the cache
//!   slidershow check                 Check external conversion tools
//!   slidershow config [--init]       Show or create the config file

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "slidershow",
    about = "Build slidershow presentation pages from annotated spreadsheets",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build presentation pages from a workbook (.tsv or .json)
    Build {
        /// Workbook file
        file: PathBuf,

        /// Build only this sheet
        #[arg(long)]
        sheet: Option<String>,

        /// Output HTML file; per-sheet files are suffixed with the sheet name.
        /// Fragments go to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page template containing a {contents} placeholder
        #[arg(long)]
        template: Option<PathBuf>,

        /// Replace FROM with TO in every filename (repeatable)
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"], action = ArgAction::Append)]
        replace_in_filename: Vec<String>,

        /// Directory searched recursively for bare filenames (repeatable)
        #[arg(long)]
        search_dir: Vec<PathBuf>,

        /// Convert HEIC/HEVC media to browser-compatible formats
        #[arg(long)]
        convert: bool,

        /// Only use existing cache entries, never transcode
        #[arg(long)]
        no_autogenerate: bool,

        /// Do not probe .mp4 files for HEVC video
        #[arg(long)]
        no_check_mp4: bool,

        /// Directory holding converted media
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Skip rows that fail instead of aborting
        #[arg(long)]
        keep_going: bool,
    },

    /// Compile one row of directives and print its points
    Compile {
        /// Start position of the clip (seconds or min:sec)
        #[arg(long)]
        start: Option<String>,

        /// Directive cells, e.g. "15" "rate 2" "30|M"
        #[arg(required = true)]
        directives: Vec<String>,
    },

    /// List converted media in the cache
    Cache {
        /// Cache directory (defaults to the configured one)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Check external conversion tools
    Check,

    /// Show the effective configuration, or write the defaults
    Config {
        /// Write a default config file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing config file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = slidershow_common::config::AppConfig::load();

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    slidershow_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Build {
            file,
            sheet,
            output,
            template,
            replace_in_filename,
            search_dir,
            convert,
            no_autogenerate,
            no_check_mp4,
            cache_dir,
            keep_going,
        } => {
            let options = commands::build::BuildOptions {
                file,
                sheet,
                output,
                template,
                replace: commands::build::replacement_pairs(replace_in_filename)?,
                search_dirs: search_dir,
                convert,
                no_autogenerate,
                no_check_mp4,
                cache_dir,
                keep_going,
            };
            commands::build::run(config, options).await
        }
        Commands::Compile { start, directives } => {
            commands::compile::run(start.as_deref(), directives)
        }
        Commands::Cache { cache_dir } => {
            commands::cache::run(cache_dir.unwrap_or(config.convert.cache_dir))
        }
        Commands::Check => commands::check::run(&config),
        Commands::Config { init, force } => commands::config::run(&config, init, force),
    }
}
