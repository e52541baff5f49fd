use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use ftir_pca::render::image::ImageFormat;
use ftir_pca::render::{ImageRenderer, ScatterRenderer, WindowRenderer};
use ftir_pca::{pipeline, AlignmentStrategy, PipelineConfig, PipelineError};

/// Align FTIR spectra, project them onto two principal components and plot
/// the sample groups.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON configuration (groups, colours, strategy). Without it the
    /// four-site reference dataset is read from --data-dir.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding <label>.txt files when no configuration is given
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Alignment strategy, overrides the configuration
    #[arg(short, long, value_enum)]
    strategy: Option<AlignmentStrategy>,

    /// Write the chart to a .png or .svg file instead of opening a window
    #[arg(short, long, value_parser = parse_output)]
    output: Option<PathBuf>,

    /// Image size for --output, as WIDTHxHEIGHT
    #[arg(long, default_value = "1000x700", value_parser = parse_size)]
    size: (u32, u32),
}

fn parse_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("'{s}' is not WIDTHxHEIGHT"))?;
    let w = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let h = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    Ok((w, h))
}

/// Reject unsupported image extensions before any input is read.
fn parse_output(s: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(s);
    ImageFormat::from_path(&path).map_err(|e| e.to_string())?;
    Ok(path)
}

/// Attach the failing stage to a pipeline error.
fn staged(e: PipelineError) -> anyhow::Error {
    let stage = e.stage();
    anyhow::Error::new(e).context(format!("{stage} stage failed"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .map_err(staged)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => PipelineConfig::reference_dataset(&cli.data_dir),
    };
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    info!("running {} alignment on {} groups", config.strategy, config.groups.len());

    let output = pipeline::run(&config).map_err(staged)?;

    let renderer: Box<dyn ScatterRenderer> = match &cli.output {
        Some(path) => Box::new(ImageRenderer::new(path, cli.size)),
        None => Box::new(WindowRenderer::default()),
    };
    pipeline::visualize(&output.projection, &config, renderer.as_ref()).map_err(staged)?;
    Ok(())
}
