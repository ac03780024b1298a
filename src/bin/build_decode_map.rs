//! Offline reference builder.
//!
//! Reads the body paragraphs of a source `.docx`, segments them into
//! heading -> explanation pairs and writes the direct reference map as JSON.
use std::path::PathBuf;

use anyhow::{Context, Result};
use checkdecode::{build_reference_from_docx, write_reference_map, BuilderConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "build-decode-map", about = "Build a decode map from a reference .docx", version)]
struct Args {
    /// Source document with headings followed by their explanations.
    #[arg(long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Where to write the JSON map.
    #[arg(long = "output", value_name = "FILE", default_value = "decode_map.json")]
    output: PathBuf,

    /// Longest line, in characters, still treated as a heading.
    #[arg(long = "max-heading-chars")]
    max_heading_chars: Option<usize>,

    /// Lead-in that marks a short line as body text. Repeat to add several;
    /// replaces the built-in list when given.
    #[arg(long = "reserved-prefix", value_name = "PREFIX")]
    reserved_prefixes: Vec<String>,
}

impl Args {
    fn builder_config(&self) -> BuilderConfig {
        let mut cfg = BuilderConfig::default();
        if let Some(max) = self.max_heading_chars {
            cfg.max_heading_chars = max;
        }
        if !self.reserved_prefixes.is_empty() {
            cfg.reserved_prefixes = self.reserved_prefixes.clone();
        }
        cfg
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = args.builder_config();
    cfg.validate().context("invalid builder options")?;

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read input {}", args.input.display()))?;
    let map = build_reference_from_docx(&bytes, &cfg)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    write_reference_map(&args.output, &map)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("OK. Keys: {}", map.len());
    Ok(())
}
