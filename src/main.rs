// src/main.rs
//
// chapterhtml — splits a pandoc-generated HTML manual into website chapters.
//
// Reads the whole manual into memory, runs the rewrite pipeline, then writes
// one fragment file per manual part into the output directory. The fragment
// names are fixed; the document structure has to match them or the run fails.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Generated manual to convert
    #[arg(default_value = "manual.html")]
    input: PathBuf,

    /// Directory the chapter fragments are written into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    chapterhtml::run(&cli.input, &cli.out_dir)
        .with_context(|| format!("converting {}", cli.input.display()))?;
    Ok(())
}
