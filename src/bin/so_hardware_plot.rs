//! Plot the detectors of a hardware file.
//!
//! Detectors should be pre-selected with so_hardware_trim before
//! plotting; a full nominal model renders, but the result is slow to
//! draw and cluttered.

use clap::Parser;
use log::warn;
use so_hardware::plot::{plot_detectors, PlotOptions};
use so_hardware::Hardware;
use std::path::{Path, PathBuf};

/// Detector count above which the tool suggests trimming first.
const CLUTTER_THRESHOLD: usize = 10_000;

/// Command line arguments for the detector plotting tool
#[derive(Parser, Debug)]
#[command(
    name = "so_hardware_plot",
    about = "Read a hardware file and plot its detectors",
    long_about = None,
    after_help = "Detectors should be pre-selected with so_hardware_trim before plotting."
)]
struct Args {
    /// Input hardware file path
    #[arg(long, required = true)]
    hardware: PathBuf,

    /// Output plot file name (.svg or .png; default derived from the input)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Plot width in degrees (default: derived from the detector extent)
    #[arg(long)]
    width: Option<f64>,

    /// Plot height in degrees (default: derived from the detector extent)
    #[arg(long)]
    height: Option<f64>,

    /// Annotate the plot with pixel and polarization labels
    #[arg(long)]
    labels: bool,
}

/// Derive the default output name from the input file, swapping the
/// hardware-file extension for .svg.
fn default_out(input: &Path) -> PathBuf {
    let mut stem = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "hardware".to_string());
    for suffix in [".toml.gz", ".toml", ".gz"] {
        if let Some(stripped) = stem.strip_suffix(suffix) {
            stem = stripped.to_string();
            break;
        }
    }
    input.with_file_name(format!("{}.svg", stem))
}

fn main() -> anyhow::Result<()> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();

    let hw = Hardware::load(&args.hardware)?;
    if hw.ndet() > CLUTTER_THRESHOLD {
        warn!(
            "plotting {} detectors; consider trimming the model first",
            hw.ndet()
        );
    }

    let out = args.out.unwrap_or_else(|| default_out(&args.hardware));
    let opts = PlotOptions {
        width: args.width,
        height: args.height,
        labels: args.labels,
    };
    plot_detectors(&hw, &out, &opts)?;
    println!("Plotted {} detectors to {}", hw.ndet(), out.display());
    Ok(())
}
