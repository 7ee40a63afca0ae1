use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rust_dbgraph::render::DotStyle;
use rust_dbgraph::{build_graph, pack_archive, GraphOptions, InputSource};

#[derive(Parser)]
#[command(name = "rust-dbgraph")]
#[command(author, version, about = "Infer table relationships from stored procedure joins")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a tables.json export
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Directory of procedure/package/view source files
    #[arg(long, requires = "tables")]
    sources: Option<PathBuf>,

    /// File name pattern for source files (repeatable, defaults to *.sql)
    #[arg(long = "pattern")]
    patterns: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the join graph as Graphviz DOT
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["archive", "sources"])
    ))]
    Render {
        /// ZIP archive with tables.json and sources.json
        #[arg(short, long, conflicts_with_all = ["tables", "sources"])]
        archive: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Output path for the DOT file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save the loaded metadata as a ZIP archive
        #[arg(long)]
        save_archive: Option<PathBuf>,

        /// Use HTML-like table labels instead of record labels
        #[arg(long)]
        html: bool,
    },

    /// Bundle tables.json and a source directory into a ZIP archive
    Pack {
        /// Path to a tables.json export
        #[arg(long)]
        tables: PathBuf,

        /// Directory of procedure/package/view source files
        #[arg(long)]
        sources: PathBuf,

        /// File name pattern for source files (repeatable, defaults to *.sql)
        #[arg(long = "pattern")]
        patterns: Vec<String>,

        /// Output path for the archive
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            archive,
            source,
            output,
            save_archive,
            html,
        } => {
            let input = match (archive, source.tables, source.sources) {
                (Some(path), _, _) => InputSource::Archive(path),
                (None, Some(tables), Some(sources_dir)) => InputSource::Files {
                    tables,
                    sources_dir,
                    patterns: source.patterns,
                },
                _ => anyhow::bail!("either --archive or both --tables and --sources are required"),
            };

            let options = GraphOptions {
                input,
                output_path: output,
                save_archive,
                style: if html { DotStyle::Html } else { DotStyle::Record },
            };

            build_graph(options)?;
        }
        Commands::Pack {
            tables,
            sources,
            patterns,
            output,
        } => {
            pack_archive(&tables, &sources, &patterns, &output)?;
        }
    }

    Ok(())
}

/// Log to stderr so DOT written to stdout stays clean. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rust_dbgraph={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
