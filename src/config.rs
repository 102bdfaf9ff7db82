use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for the newsreel assembly engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Canonical output format shared by every clip
    pub video: VideoConfig,

    /// Encoder settings for intermediate and final passes
    pub encode: EncodeConfig,

    /// Chroma-key and presenter-overlay settings
    pub overlay: OverlayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            video: VideoConfig::default(),
            encode: EncodeConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;
        self.encode.validate()?;
        self.overlay.validate()?;
        Ok(())
    }
}

/// Canonical resolution and frame rate for every produced clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Output frame rate
    pub fps: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        // x264 with yuv420p requires even dimensions
        if self.width == 0 || self.width % 2 != 0 {
            return Err(ConfigError::InvalidValue {
                key: "video.width".to_string(),
                value: self.width.to_string(),
            }
            .into());
        }

        if self.height == 0 || self.height % 2 != 0 {
            return Err(ConfigError::InvalidValue {
                key: "video.height".to_string(),
                value: self.height.to_string(),
            }
            .into());
        }

        if self.fps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "video.fps".to_string(),
                value: self.fps.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Encoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// x264 preset for intermediate clips
    pub preset: String,

    /// CRF for intermediate clips
    pub crf: u8,

    /// x264 preset for the final overlay pass
    pub final_preset: String,

    /// CRF for the final overlay pass
    pub final_crf: u8,

    /// AAC bitrate, e.g. "192k"
    pub audio_bitrate: String,

    /// Audio sample rate in Hz
    pub audio_sample_rate: u32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            preset: "fast".to_string(),
            crf: 18,
            final_preset: "medium".to_string(),
            final_crf: 23,
            audio_bitrate: "192k".to_string(),
            audio_sample_rate: 48000,
        }
    }
}

impl EncodeConfig {
    fn validate(&self) -> Result<()> {
        if self.crf > 51 {
            return Err(ConfigError::InvalidValue {
                key: "encode.crf".to_string(),
                value: self.crf.to_string(),
            }
            .into());
        }

        if self.final_crf > 51 {
            return Err(ConfigError::InvalidValue {
                key: "encode.final_crf".to_string(),
                value: self.final_crf.to_string(),
            }
            .into());
        }

        if self.audio_sample_rate == 0 {
            return Err(ConfigError::InvalidValue {
                key: "encode.audio_sample_rate".to_string(),
                value: self.audio_sample_rate.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Chroma-key and presenter-overlay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Key color keyed out of the template artwork and the presenter clip
    pub key_color: String,

    /// Chroma similarity when keying the template artwork
    pub template_similarity: f32,

    /// Chroma blend when keying the template artwork
    pub template_blend: f32,

    /// Chroma similarity when keying the presenter (record) clip
    pub record_similarity: f32,

    /// Chroma blend when keying the presenter (record) clip
    pub record_blend: f32,

    /// Vertical offset of the presenter clip past the bottom edge, in pixels
    pub record_bottom_margin: i32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            key_color: "0x00FF00".to_string(),
            template_similarity: 0.1,
            template_blend: 0.0,
            record_similarity: 0.15,
            record_blend: 0.05,
            record_bottom_margin: 32,
        }
    }
}

impl OverlayConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("overlay.template_similarity", self.template_similarity),
            ("overlay.template_blend", self.template_blend),
            ("overlay.record_similarity", self.record_similarity),
            ("overlay.record_blend", self.record_blend),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let original_config = Config::default();

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.video.width, loaded_config.video.width);
        assert_eq!(original_config.video.fps, loaded_config.video.fps);
        assert_eq!(original_config.encode.preset, loaded_config.encode.preset);
        assert_eq!(
            original_config.overlay.key_color,
            loaded_config.overlay.key_color
        );
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_file("/nonexistent/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_odd_resolution() {
        let mut config = Config::default();
        config.video.width = 1921;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_crf() {
        let mut config = Config::default();
        config.encode.crf = 90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_chroma_similarity() {
        let mut config = Config::default();
        config.overlay.record_similarity = 1.5;
        assert!(config.validate().is_err());
    }
}
