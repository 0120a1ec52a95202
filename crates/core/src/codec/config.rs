//! Configuration for the codec module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the standard codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Path to ffmpeg binary, used for MP3 encoding.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// MP3 bitrate in kbps.
    #[serde(default = "default_mp3_bitrate")]
    pub mp3_bitrate_kbps: u32,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Directory for size-estimation scratch files.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_mp3_bitrate() -> u32 {
    192
}

fn default_log_level() -> String {
    "error".to_string()
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("convertino")
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            mp3_bitrate_kbps: default_mp3_bitrate(),
            ffmpeg_log_level: default_log_level(),
            temp_dir: default_temp_dir(),
        }
    }
}

impl CodecConfig {
    /// Creates a new config with a custom ffmpeg path.
    pub fn with_ffmpeg_path(ffmpeg_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ..Default::default()
        }
    }

    /// Sets the temp directory.
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Sets the MP3 bitrate.
    pub fn with_mp3_bitrate(mut self, kbps: u32) -> Self {
        self.mp3_bitrate_kbps = kbps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.mp3_bitrate_kbps, 192);
        assert_eq!(config.ffmpeg_log_level, "error");
        assert!(config.temp_dir.ends_with("convertino"));
    }

    #[test]
    fn test_config_builder() {
        let config = CodecConfig::with_ffmpeg_path(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
            .with_temp_dir(PathBuf::from("/tmp/test"))
            .with_mp3_bitrate(320);

        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.temp_dir, PathBuf::from("/tmp/test"));
        assert_eq!(config.mp3_bitrate_kbps, 320);
    }

    #[test]
    fn test_config_serialization() {
        let config = CodecConfig::default().with_mp3_bitrate(256);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CodecConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
