//! Runtime configuration for the LUT renderer.

use serde::{Deserialize, Serialize};

use crate::lut::geometry::{LutGeometry, MAX_LUT_SIZE};

/// Default LUT edge size (per-channel resolution).
pub const DEFAULT_LUT_SIZE: u32 = 32;

/// Environment variable overriding [`LutRendererConfig::lut_size`].
pub const LUT_SIZE_ENV: &str = "RETROLUT_LUT_SIZE";

/// Configuration for [`crate::ColorGradingLutRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LutRendererConfig {
    /// Edge size of the LUT cube, in `2..=MAX_LUT_SIZE`.
    #[serde(default = "default_lut_size")]
    pub lut_size: u32,
}

fn default_lut_size() -> u32 {
    DEFAULT_LUT_SIZE
}

impl Default for LutRendererConfig {
    fn default() -> Self {
        Self {
            lut_size: DEFAULT_LUT_SIZE,
        }
    }
}

impl LutRendererConfig {
    /// Defaults, with `RETROLUT_LUT_SIZE` applied when it parses to a valid size.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(LUT_SIZE_ENV) {
            match parse_lut_size(&raw) {
                Some(size) => config.lut_size = size,
                None => tracing::warn!(
                    "Ignoring {LUT_SIZE_ENV}={raw:?}: expected an integer in 2..={MAX_LUT_SIZE}"
                ),
            }
        }
        config
    }
}

fn parse_lut_size(raw: &str) -> Option<u32> {
    let size = raw.trim().parse::<u32>().ok()?;
    LutGeometry::try_new(size).ok().map(|_| size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lut_size_is_32() {
        assert_eq!(LutRendererConfig::default().lut_size, 32);
    }

    #[test]
    fn test_missing_lut_size_deserializes_to_default() {
        let config: LutRendererConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LutRendererConfig::default());

        let config: LutRendererConfig = serde_json::from_str(r#"{"lut_size": 16}"#).unwrap();
        assert_eq!(config.lut_size, 16);
    }

    #[test]
    fn test_env_lut_size_must_fit_geometry() {
        assert_eq!(parse_lut_size("64"), Some(64));
        assert_eq!(parse_lut_size(" 16\n"), Some(16));
        assert_eq!(parse_lut_size(&MAX_LUT_SIZE.to_string()), Some(MAX_LUT_SIZE));

        assert_eq!(parse_lut_size("1"), None);
        assert_eq!(parse_lut_size("256"), None);
        assert_eq!(parse_lut_size("65536"), None);
        assert_eq!(parse_lut_size("big"), None);
    }
}
