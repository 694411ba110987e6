//! Trim a hardware file down to a detector subset.
//!
//! Selects detectors by telescope, tube, or per-property regex matchers
//! and writes a reduced hardware file containing only the selected
//! detectors and the hardware that supports them.

use clap::Parser;
use log::info;
use so_hardware::shared_args::OutputArgs;
use so_hardware::Hardware;
use std::path::PathBuf;

/// Parse a detector matcher in "PROP=REGEX" form.
fn parse_match(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((prop, pattern)) if !prop.is_empty() && !pattern.is_empty() => {
            Ok((prop.to_string(), pattern.to_string()))
        }
        _ => Err("matcher must be in format 'PROP=REGEX'".to_string()),
    }
}

/// Command line arguments for the hardware trimming tool
#[derive(Parser, Debug)]
#[command(
    name = "so_hardware_trim",
    about = "Read a hardware file, select a detector subset, and write it to disk",
    long_about = None
)]
struct Args {
    /// Input hardware file path
    #[arg(long, required = true)]
    hardware: PathBuf,

    /// Output file base name (extension appended by the tool)
    #[arg(long, default_value = "trimmed")]
    out: String,

    #[command(flatten)]
    output: OutputArgs,

    /// Comma-separated telescope names to keep
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    telescopes: Option<Vec<String>>,

    /// Comma-separated tube names to keep (wins over --telescopes)
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    tubes: Option<Vec<String>>,

    /// Detector property matcher, repeatable (e.g. --match band=.*_f090)
    #[arg(long = "match", value_name = "PROP=REGEX", value_parser = parse_match)]
    matches: Vec<(String, String)>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();

    let path = args.output.output_path(&args.out);
    // refuse an existing target before doing any work
    so_hardware::io::ensure_writable(&path, args.output.overwrite)?;

    let hw = Hardware::load(&args.hardware)?;
    let trimmed = hw.select(
        args.telescopes.as_deref(),
        args.tubes.as_deref(),
        &args.matches,
    )?;
    info!(
        "selected {} of {} detectors",
        trimmed.ndet(),
        hw.ndet()
    );

    trimmed.dump(&path, args.output.overwrite, !args.output.plain)?;
    println!(
        "Wrote trimmed hardware model with {} detectors to {}",
        trimmed.ndet(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match() {
        assert_eq!(
            parse_match("band=.*_f090").unwrap(),
            ("band".to_string(), ".*_f090".to_string())
        );
        assert!(parse_match("band").is_err());
        assert!(parse_match("=x").is_err());
        assert!(parse_match("band=").is_err());
    }

    #[test]
    fn test_parse_match_keeps_equals_in_pattern() {
        // only the first '=' splits the matcher
        assert_eq!(
            parse_match("name=a=b").unwrap(),
            ("name".to_string(), "a=b".to_string())
        );
    }
}
