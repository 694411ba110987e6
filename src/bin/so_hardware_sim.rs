//! Simulate the nominal hardware model and write it to disk.
//!
//! Builds the current as-designed model, synthesizes the detectors of
//! every telescope, and writes the result as a (by default gzipped)
//! hardware file.
//!
//! Usage:
//! ```
//! so_hardware_sim [OPTIONS]
//! ```
//!
//! See --help for detailed options.

use clap::Parser;
use log::info;
use so_hardware::shared_args::OutputArgs;
use so_hardware::{nominal, sim_telescope_detectors};

/// Command line arguments for the hardware simulation tool
#[derive(Parser, Debug)]
#[command(
    name = "so_hardware_sim",
    about = "Simulate the current nominal hardware model and write it to disk",
    long_about = None
)]
struct Args {
    /// Output file base name (extension appended by the tool)
    #[arg(long, default_value = "hardware")]
    out: String,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();

    let path = args.output.output_path(&args.out);
    // refuse an existing target before doing any work
    so_hardware::io::ensure_writable(&path, args.output.overwrite)?;

    let mut hw = nominal();
    let telescopes: Vec<String> = hw.telescopes.keys().cloned().collect();
    for telescope in &telescopes {
        let generated = sim_telescope_detectors(&mut hw, telescope)?;
        info!("{}: simulated {} detectors", telescope, generated);
    }

    hw.dump(&path, args.output.overwrite, !args.output.plain)?;
    println!(
        "Wrote hardware model with {} detectors to {}",
        hw.ndet(),
        path.display()
    );
    Ok(())
}
