//! Command line arguments shared across the hardware tools.

use clap::Parser;
use std::path::PathBuf;

/// Output flags shared by the tools that write hardware files.
#[derive(Parser, Debug, Clone)]
pub struct OutputArgs {
    /// Write uncompressed output (default implies gzip compression)
    #[arg(long)]
    pub plain: bool,

    /// Allow overwriting an existing output file
    #[arg(long)]
    pub overwrite: bool,
}

impl OutputArgs {
    /// Resolve the output path for a base name, appending the extension
    /// that matches the compression choice.
    pub fn output_path(&self, base: &str) -> PathBuf {
        crate::io::output_path(base, self.plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_follows_plain_flag() {
        let compressed = OutputArgs {
            plain: false,
            overwrite: false,
        };
        assert_eq!(
            compressed.output_path("hardware"),
            PathBuf::from("hardware.toml.gz")
        );
        let plain = OutputArgs {
            plain: true,
            overwrite: false,
        };
        assert_eq!(plain.output_path("hardware"), PathBuf::from("hardware.toml"));
    }
}
