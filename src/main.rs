use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use pgx_stats_rs::image_pipeline::{DecodeConfig, PgxStatsPipeline};
use pgx_stats_rs::logger;

use tracing::info;

const USAGE: &str = "usage: pgx_stats [--strict] [NAME=]PATH...";

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut strict = false;
    let mut inputs: Vec<(String, PathBuf)> = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => strict = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => inputs.push(parse_input(&arg)),
        }
    }

    if inputs.is_empty() {
        bail!("no input files given\n{USAGE}");
    }

    let config = if strict {
        DecodeConfig::strict()
    } else {
        DecodeConfig::default()
    };
    let pipeline = PgxStatsPipeline::new(config);

    info!("Starting pgx_stats...");
    info!(
        "Strict checks: {}",
        if strict { "enabled" } else { "disabled" }
    );

    let summaries = pipeline
        .summarize_batch(&inputs)
        .context("failed to summarize PGX inputs")?;

    for summary in &summaries {
        println!("{summary}");
    }

    info!(count = summaries.len(), "Done");
    Ok(())
}

/// `NAME=PATH` names the image explicitly, a bare `PATH` is named after its file stem.
fn parse_input(arg: &str) -> (String, PathBuf) {
    if let Some((name, path)) = arg.split_once('=') {
        if !name.is_empty() && !path.is_empty() {
            return (name.to_string(), PathBuf::from(path));
        }
    }

    let path = PathBuf::from(arg);
    let name = Path::new(arg)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg.to_string());
    (name, path)
}
