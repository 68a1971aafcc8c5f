//! honeycomb CLI - Convert images to hexagonal mosaics

use clap::{Parser, ValueEnum};
use honeycomb::{source, ExportFormat, Honeycomb, HoneycombConfig, HoneycombError, SamplingMask};
use std::path::PathBuf;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Png,
    Jpeg,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Svg => ExportFormat::Svg,
            Format::Png => ExportFormat::Png,
            Format::Jpeg => ExportFormat::Jpeg,
            Format::Json => ExportFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mask {
    Square,
    Hexagon,
}

#[derive(Parser)]
#[command(name = "honeycomb", about = "Convert images to honeycomb pixel art")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// Hexagon circumradius in source pixels
    #[arg(short = 's', long)]
    hex_size: Option<f64>,
    /// Output format
    #[arg(short, long, value_enum, default_value = "svg")]
    format: Format,
    /// Output file (default: derived from the input name)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// JSON settings file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Do not outline the hexagons
    #[arg(long)]
    no_stroke: bool,
    /// Pixels averaged for each hexagon
    #[arg(long, value_enum)]
    mask: Option<Mask>,
    /// Upscaling factor for PNG/JPEG output
    #[arg(long)]
    scale: Option<u32>,
    /// Downsize sources wider than this
    #[arg(long)]
    max_width: Option<u32>,
    /// Downsize sources taller than this
    #[arg(long)]
    max_height: Option<u32>,
    /// Sample hexagons on all cores
    #[arg(long)]
    parallel: bool,
}

impl Args {
    fn config(&self) -> Result<HoneycombConfig, HoneycombError> {
        let mut config = match &self.config {
            Some(path) => HoneycombConfig::from_file(path)?,
            None => HoneycombConfig::default(),
        };
        if let Some(hex_size) = self.hex_size {
            config.hex_size = hex_size;
        }
        if self.no_stroke {
            config.stroke = false;
        }
        if let Some(mask) = self.mask {
            config.mask = match mask {
                Mask::Square => SamplingMask::Square,
                Mask::Hexagon => SamplingMask::Hexagon,
            };
        }
        if let Some(scale) = self.scale {
            config.raster_scale = scale;
        }
        if let Some(width) = self.max_width {
            config.max_width = width;
        }
        if let Some(height) = self.max_height {
            config.max_height = height;
        }
        config.parallel |= self.parallel;
        Ok(config)
    }
}

fn main() -> Result<(), HoneycombError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = args.config()?;
    let converter = Honeycomb::from_config(&config)?;

    let image = image::open(&args.input)?;
    let result = converter.convert(&image);

    let summary = result.summary();
    log::info!(
        "{} hexagons, hex size {}px, source {}x{}, output {}x{}",
        summary.hexagons,
        summary.hex_size,
        summary.source_width,
        summary.source_height,
        summary.output_width,
        summary.output_height
    );

    let format = ExportFormat::from(args.format);
    let bytes = converter.export(&result, format)?;

    let output = args.output.clone().unwrap_or_else(|| {
        let name = source::output_file_name(&source::base_name(&args.input), format);
        args.input.with_file_name(name)
    });
    std::fs::write(&output, &bytes)?;
    log::info!("wrote {} bytes of {}", bytes.len(), format.mime_type());

    println!("{}", output.display());
    Ok(())
}
