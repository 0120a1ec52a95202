use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - MP3 bitrate is within what libmp3lame accepts
/// - ffmpeg path is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let bitrate = config.codec.mp3_bitrate_kbps;
    if !(32..=320).contains(&bitrate) {
        return Err(ConfigError::ValidationError(format!(
            "codec.mp3_bitrate_kbps must be between 32 and 320, got {}",
            bitrate
        )));
    }

    if config.codec.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "codec.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
