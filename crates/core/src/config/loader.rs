use figment::{
    providers::{Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from a TOML file
///
/// Only the file is read; the environment does not override any setting.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportFormat;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[codec]
mp3_bitrate_kbps = 256

[output]
report_format = "json"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.codec.mp3_bitrate_kbps, 256);
        assert_eq!(config.codec.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.output.report_format, ReportFormat::Json);
    }

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.report_format, ReportFormat::Text);
    }

    #[test]
    fn test_load_config_from_str_bad_format() {
        let toml = r#"
[output]
report_format = "xml"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[codec]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
temp_dir = "/var/tmp/convertino"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(
            config.codec.ffmpeg_path,
            PathBuf::from("/opt/ffmpeg/bin/ffmpeg")
        );
        assert_eq!(config.codec.temp_dir, PathBuf::from("/var/tmp/convertino"));
        assert_eq!(config.codec.mp3_bitrate_kbps, 192);
    }

    #[test]
    fn test_load_config_from_file_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[codec\nmp3_bitrate_kbps = ").unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
