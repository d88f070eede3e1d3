//! Subcommands and the input/config helpers they share.

pub mod batch;
pub mod config;
pub mod normalize;
pub mod parse;

use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use kharcha_core::{KharchaConfig, OcrOutput};

/// Configuration file location: the `--config` flag, else the user config directory.
pub fn config_file(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(path),
        None => KharchaConfig::default_path(
            &dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")),
        ),
    }
}

/// Load the configuration, falling back to defaults when no file exists.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<KharchaConfig> {
    let path = config_file(explicit);
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(KharchaConfig::from_file(&path)?)
    } else if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display())
    } else {
        Ok(KharchaConfig::default())
    }
}

/// Read an input path, or stdin for `-`.
pub fn read_input(input: &Path) -> anyhow::Result<Vec<u8>> {
    if input == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(std::fs::read(input)?)
}

/// Decode file contents to text. `.json` files hold an OCR engine result.
pub fn decode_text(input: &Path, bytes: &[u8]) -> anyhow::Result<String> {
    let is_json = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let output: OcrOutput = serde_json::from_slice(bytes)?;
        debug!("OCR output with engine confidence {:.2}", output.confidence);
        Ok(output.text)
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Hex SHA-256 of the raw input, used as the record id.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
