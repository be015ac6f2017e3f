use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::BiabError;

/// Highest bar count a song can hold, bar 0 is never used.
pub const MAX_BARS: usize = 255;

/// Tick resolution of the embedded event table.
pub const TICKS_PER_QUARTER: u32 = 120;

/// Byte announcing the style block.
pub const STYLE_MARKER: u8 = 0x42;

/// Extension every style file name carries.
pub const STYLE_SIGNATURE: &str = ".STY";

/// Format constants the decoding passes work with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Size of the bar table, the chord streams cover `max_bars * 4` beats
    pub max_bars: usize,
    pub ticks_per_quarter: u32,
    pub style_marker: u8,
    pub style_signature: String,
    /// Number of offsets after the marker probed for the signature
    pub style_probe_window: usize,
    /// The byte following the marker must be strictly below this value
    pub max_style_length_byte: u8,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_bars: MAX_BARS,
            ticks_per_quarter: TICKS_PER_QUARTER,
            style_marker: STYLE_MARKER,
            style_signature: STYLE_SIGNATURE.to_string(),
            style_probe_window: 16,
            max_style_length_byte: 16,
        }
    }
}

impl DecoderConfig {
    /// Beat units covered by each chord stream
    pub const fn chord_beat_limit(&self) -> usize {
        self.max_bars * 4
    }

    /// Reads a JSON override, missing fields keep their default value
    pub fn read_config(path: &Path) -> Result<Self, BiabError> {
        let file = File::open(path).map_err(|err| {
            BiabError::ConfigError(format!("Could not open configuration {path:?}: {err}"))
        })?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader).map_err(|err| {
            BiabError::ConfigError(format!("Could not read configuration {err:}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BiabError> {
        if self.max_bars == 0 {
            return Err(BiabError::ConfigError("max_bars must be positive".to_string()));
        }
        if self.ticks_per_quarter == 0 {
            return Err(BiabError::ConfigError(
                "ticks_per_quarter must be positive".to_string(),
            ));
        }
        if self.style_signature.is_empty() {
            return Err(BiabError::ConfigError(
                "style_signature must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
