use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use svgicon::Config;
use svgicon::icon;

#[derive(Parser, Debug)]
#[command(name = "svgicon")]
#[command(version, about = "Render simple SVG artwork into uniform PNG icons")]
struct Cli {
    /// SVG document to render
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// PNG file to write
    #[arg(long, short = 'o', value_name = "OUTPUT")]
    output: PathBuf,

    /// Re-style the art with a named palette and paint the background disc
    #[arg(long, short = 'p', value_name = "NAME")]
    palette: Option<String>,

    /// Side of the supersampled canvas in pixels
    #[arg(long, value_name = "N")]
    render_size: Option<u32>,

    /// Side of the final image in pixels
    #[arg(long, short = 's', value_name = "N")]
    output_size: Option<u32>,

    /// Share of the canvas the document occupies (0.0-1.0)
    #[arg(long, short = 'f', value_name = "F")]
    fraction: Option<f64>,

    /// Skip the background disc even when a palette is given
    #[arg(long, action = ArgAction::SetTrue)]
    no_background: bool,

    /// Config file to use instead of ~/.config/svgicon/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut options = config.render_options();
    if let Some(size) = cli.render_size {
        options.render_size = size;
    }
    if let Some(size) = cli.output_size {
        options.output_size = size;
    }
    if let Some(fraction) = cli.fraction {
        options.document_fraction = fraction;
    }
    if cli.no_background {
        options.background = None;
    }

    let palette = match &cli.palette {
        Some(name) => {
            let table = config
                .palette_table()
                .context("Invalid palette in configuration")?;
            let palette = table.require(name).with_context(|| {
                format!("Palette lookup failed (available: {})", table.names().join(", "))
            })?;
            Some(palette)
        }
        None => None,
    };

    log::info!("Rendering {}", cli.input.display());
    let surface = icon::render_icon(&cli.input, &options, palette.as_ref())
        .with_context(|| format!("Failed to render {}", cli.input.display()))?;

    surface
        .save(&cli.output, None)
        .with_context(|| format!("Failed to save {}", cli.output.display()))?;

    println!(
        "Wrote {}x{} icon to {}",
        surface.width(),
        surface.height(),
        cli.output.display()
    );
    Ok(())
}
