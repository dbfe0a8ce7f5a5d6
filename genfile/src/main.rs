use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use genfile::{parse_size, FileService, GeneratorRegistry};

#[derive(Parser)]
#[command(
    name = "genfile",
    version,
    about = "Generate placeholder files of an exact byte size"
)]
struct Cli {
    /// Output path; the extension selects the format
    #[arg(short, long)]
    output: PathBuf,

    /// Target size, e.g. 1048576, 512K, 2MB, 1G
    #[arg(short, long)]
    size: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let target = parse_size(&cli.size)?;

    let service = FileService::new(Arc::new(GeneratorRegistry::with_defaults()));
    service
        .generate_file(&cli.output, target)
        .with_context(|| format!("generating {}", cli.output.display()))?;
    println!("{} ({target} bytes)", cli.output.display());
    Ok(())
}
