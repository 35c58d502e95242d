//! Run configuration
//!
//! [`EngineConfig`] is the validated, fully-resolved configuration of one run.
//! It is built from compiled defaults, then the TOML file, then command-line
//! overrides, each layer replacing only the values it sets.

use crate::error::ConfigurationError;
use crate::library::DEFAULT_AUDIO_EXTENSIONS;
use std::path::PathBuf;
use tunefetch_common::config::TomlConfig;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_TOP_N: usize = 1;

/// Values given on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_dir: Option<PathBuf>,
    pub threads: Option<usize>,
    pub top_n: Option<usize>,
    /// `--force` can only switch force mode on
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Destination for downloads; also the directory scanned for existing tracks
    pub output_dir: PathBuf,
    /// Concurrent workers (W)
    pub threads: usize,
    /// Results requested per artist entry
    pub top_n: usize,
    /// Ignore the existing library when choosing candidates
    pub force: bool,
    pub audio_extensions: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            threads: DEFAULT_THREADS,
            top_n: DEFAULT_TOP_N,
            force: false,
            audio_extensions: DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Layer TOML values and command-line overrides over the defaults
    pub fn resolve(toml: &TomlConfig, overrides: &ConfigOverrides) -> Self {
        let defaults = Self::default();

        Self {
            output_dir: overrides
                .output_dir
                .clone()
                .or_else(|| toml.output_dir.clone())
                .unwrap_or(defaults.output_dir),
            threads: overrides
                .threads
                .or(toml.threads)
                .unwrap_or(defaults.threads),
            top_n: overrides.top_n.or(toml.top).unwrap_or(defaults.top_n),
            force: overrides.force || toml.force.unwrap_or(defaults.force),
            audio_extensions: toml
                .audio_extensions
                .clone()
                .filter(|exts| !exts.is_empty())
                .unwrap_or(defaults.audio_extensions),
        }
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.threads == 0 {
            return Err(ConfigurationError::InvalidThreadCount(self.threads));
        }
        if self.top_n == 0 {
            return Err(ConfigurationError::InvalidTopCount(self.top_n));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.threads, 4);
        assert_eq!(config.top_n, 1);
        assert!(!config.force);
        assert_eq!(config.audio_extensions, vec!["mp3".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_priority_cli_over_toml_over_defaults() {
        let toml = TomlConfig::from_toml_str(
            r#"
            output_dir = "/srv/music"
            threads = 8
            top = 3
            "#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            threads: Some(2),
            ..Default::default()
        };

        let config = EngineConfig::resolve(&toml, &overrides);
        assert_eq!(config.threads, 2);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.output_dir, PathBuf::from("/srv/music"));
        assert!(!config.force);
    }

    #[test]
    fn test_force_from_either_layer() {
        let toml = TomlConfig::from_toml_str("force = true").unwrap();
        assert!(EngineConfig::resolve(&toml, &ConfigOverrides::default()).force);

        let overrides = ConfigOverrides {
            force: true,
            ..Default::default()
        };
        assert!(EngineConfig::resolve(&TomlConfig::default(), &overrides).force);
    }

    #[test]
    fn test_empty_extension_list_falls_back() {
        let toml = TomlConfig::from_toml_str("audio_extensions = []").unwrap();
        let config = EngineConfig::resolve(&toml, &ConfigOverrides::default());
        assert_eq!(config.audio_extensions, vec!["mp3".to_string()]);
    }

    #[test]
    fn test_validation_rejects_zero() {
        let config = EngineConfig {
            threads: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidThreadCount(0))
        ));

        let config = EngineConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidTopCount(0))
        ));
    }
}
