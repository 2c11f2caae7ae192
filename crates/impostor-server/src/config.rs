//! Server configuration.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_words_path")]
    pub words_path: PathBuf,
    /// Fixed seed for reproducible tie-breaks and dealing.
    #[serde(default)]
    pub rng_seed: Option<u64>,
    /// Per-connection outbound queue capacity.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./frontend/dist")
}

fn default_words_path() -> PathBuf {
    PathBuf::from("./data/words.json")
}

fn default_outbound_buffer() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            words_path: default_words_path(),
            rng_seed: None,
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default location (config/default.toml) or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9000\nrng_seed = 42").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.words_path, PathBuf::from("./data/words.json"));
        assert_eq!(config.outbound_buffer, 64);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }
}
