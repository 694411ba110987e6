//! Print summaries of one or more hardware files.

use clap::Parser;
use so_hardware::info::summary;
use so_hardware::Hardware;
use std::path::PathBuf;

/// Command line arguments for the hardware summary tool
#[derive(Parser, Debug)]
#[command(
    name = "so_hardware_info",
    about = "Read one or more hardware files and print a summary to the terminal",
    long_about = None
)]
struct Args {
    /// Hardware file paths to summarize
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();

    for (index, path) in args.files.iter().enumerate() {
        if index > 0 {
            println!();
        }
        let hw = Hardware::load(path)?;
        println!("{}:", path.display());
        print!("{}", summary(&hw));
    }
    Ok(())
}
