//! rocgen — regenerate Java and Go binding stubs from the Roc Toolkit
//! documentation export.
//!
//! Reads the Doxygen XML produced for the toolkit's public C API, builds an
//! immutable model with a resolved cross-reference index, and renders one
//! source file per enum/struct/class for each selected target checkout:
//!
//! ```text
//! rocgen -t all --toolkit-dir ../roc-toolkit \
//!        --java-output-dir ../roc-java --go-output-dir ../roc-go
//! ```

mod case;
mod model;
mod parser;
mod render;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::model::ApiRoot;

const DEFAULT_DOXYGEN_DIR: &str = "build/docs/public_api/xml";

#[derive(Parser)]
#[command(
    name = "rocgen",
    about = "Generate Java and Go binding stubs from the Roc Toolkit documentation export"
)]
struct Cli {
    /// Bindings to generate
    #[arg(short = 't', long = "type", value_enum)]
    target: TargetArg,

    /// Roc Toolkit checkout
    #[arg(long, default_value = "../roc-toolkit")]
    toolkit_dir: PathBuf,

    /// Doxygen XML directory (default: <toolkit_dir>/build/docs/public_api/xml)
    #[arg(long)]
    doxygen_dir: Option<PathBuf>,

    /// roc-java checkout to write Java sources into
    #[arg(long, default_value = "../roc-java")]
    java_output_dir: PathBuf,

    /// roc-go checkout to write Go sources into
    #[arg(long, default_value = "../roc-go")]
    go_output_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetArg {
    All,
    Java,
    Go,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("ROCGEN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let doxygen_dir = cli
        .doxygen_dir
        .clone()
        .unwrap_or_else(|| cli.toolkit_dir.join(DEFAULT_DOXYGEN_DIR));

    let api = parser::parse_api(&cli.toolkit_dir, &doxygen_dir)?;

    if matches!(cli.target, TargetArg::All | TargetArg::Java) {
        run_generator(render::Target::Java, &cli.java_output_dir, &api)?;
    }
    if matches!(cli.target, TargetArg::All | TargetArg::Go) {
        run_generator(render::Target::Go, &cli.go_output_dir, &api)?;
    }

    Ok(())
}

fn run_generator(target: render::Target, output_dir: &Path, api: &ApiRoot) -> Result<()> {
    info!("running {target:?} generator for {}", output_dir.display());

    let generator = render::create_generator(target, api);
    render::generate_files(generator.as_ref(), api, output_dir)
}
