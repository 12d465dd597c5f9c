use crate::config::{ConfigError, EditorConfig};
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and validate editor settings from a YAML file
pub fn load_config(config_path: &Path) -> Result<EditorConfig, ConfigError> {
    info!("Loading editor settings from: {:?}", config_path);

    let file = File::open(config_path)?;
    let config: EditorConfig = serde_yaml::from_reader(file)?;

    config.validate()?;

    Ok(config)
}

/// Load settings when a path is given, otherwise use the built-in defaults
pub fn load_config_or_default(config_path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No settings file given, using built-in defaults");
            Ok(EditorConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_settings_file() {
        let yaml = r#"
naming:
  ovswitch: "br"
addresses:
  ipv4_seed: "10.0.0.1"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.naming.ovswitch, "br");
        assert_eq!(config.addresses.ipv4_seed, "10.0.0.1");
        assert_eq!(config.addresses.mac_seed, "00:00:00:00:00:00");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let yaml = r#"
defaults:
  controller:
    ip: "localhost"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(matches!(
            load_config(temp_file.path()),
            Err(ConfigError::InvalidDefaults(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        assert!(matches!(load_config(&missing), Err(ConfigError::Io(_))));
        assert!(load_config_or_default(None).is_ok());
    }
}
