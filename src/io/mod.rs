//! Hardware file storage.
//!
//! Models are stored as TOML, optionally gzip-compressed. Loading sniffs
//! the gzip magic bytes, so callers never state the compression. Writes go
//! through a temporary file that is renamed into place once complete.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::Hardware;

/// Leading bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors raised by hardware file storage.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("output file {0} already exists (pass overwrite to replace it)")]
    Exists(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize hardware model: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to parse hardware model: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// Resolve the on-disk path for an output base name.
///
/// The tools treat their `--out` argument as a base name and append the
/// extension: `.toml` for plain output, `.toml.gz` for compressed output.
pub fn output_path(base: &str, plain: bool) -> PathBuf {
    if plain {
        PathBuf::from(format!("{}.toml", base))
    } else {
        PathBuf::from(format!("{}.toml.gz", base))
    }
}

/// Fail if `path` exists and overwriting was not requested.
pub fn ensure_writable(path: &Path, overwrite: bool) -> Result<(), StoreError> {
    if path.exists() && !overwrite {
        return Err(StoreError::Exists(path.to_path_buf()));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "hardware".to_string());
    path.with_file_name(format!("{}.tmp", name))
}

impl Hardware {
    /// Write the model to `path`.
    ///
    /// Refuses to touch an existing file unless `overwrite` is set. With
    /// `compress`, the TOML text is gzip-compressed. On any error the
    /// target file is left as it was.
    pub fn dump(&self, path: &Path, overwrite: bool, compress: bool) -> Result<(), StoreError> {
        ensure_writable(path, overwrite)?;
        let text = toml::to_string(self)?;

        let tmp = tmp_path(path);
        let result = (|| -> Result<(), StoreError> {
            let file = File::create(&tmp)?;
            if compress {
                let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
                encoder.write_all(text.as_bytes())?;
                encoder.finish()?.flush()?;
            } else {
                let mut writer = BufWriter::new(file);
                writer.write_all(text.as_bytes())?;
                writer.flush()?;
            }
            Ok(())
        })();
        if let Err(err) = result {
            let _ = std::fs::remove_file(&tmp);
            return Err(err);
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Read a model from `path`, transparently decompressing gzip input.
    pub fn load(path: &Path) -> Result<Hardware, StoreError> {
        let mut header = [0u8; 2];
        let gzipped = {
            let mut file = File::open(path)?;
            file.read_exact(&mut header).is_ok() && header == GZIP_MAGIC
        };

        let file = File::open(path)?;
        let mut text = String::new();
        if gzipped {
            let mut decoder = GzDecoder::new(BufReader::new(file));
            decoder.read_to_string(&mut text)?;
        } else {
            let mut reader = BufReader::new(file);
            reader.read_to_string(&mut text)?;
        }
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_extensions() {
        assert_eq!(output_path("hardware", false), Path::new("hardware.toml.gz"));
        assert_eq!(output_path("hardware", true), Path::new("hardware.toml"));
        assert_eq!(
            output_path("out/trimmed", false),
            Path::new("out/trimmed.toml.gz")
        );
    }

    #[test]
    fn test_tmp_path_keeps_directory() {
        let tmp = tmp_path(Path::new("some/dir/hw.toml.gz"));
        assert_eq!(tmp, Path::new("some/dir/hw.toml.gz.tmp"));
    }

    #[test]
    fn test_ensure_writable_missing_target() {
        assert!(ensure_writable(Path::new("does/not/exist.toml"), false).is_ok());
    }
}
