//! Runtime settings read from `EOS_*` environment variables.

use log::warn;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fixed_width::ValueMode;
use crate::import::ImportSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_mb: usize,
    pub batch_size: usize,
    pub strict_values: bool,
    pub allowed_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database: PathBuf::from("eos.sqlite"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_mb: 16,
            batch_size: 100,
            strict_values: false,
            allowed_extensions: vec!["ost".to_string(), "txt".to_string()],
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; missing keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("EOS_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "EOS_PORT", defaults.port),
            database: lookup("EOS_DATABASE")
                .map(PathBuf::from)
                .unwrap_or(defaults.database),
            upload_dir: lookup("EOS_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_mb: parsed(&lookup, "EOS_MAX_UPLOAD_MB", defaults.max_upload_mb),
            batch_size: parsed(&lookup, "EOS_BATCH_SIZE", defaults.batch_size).max(1),
            strict_values: parsed(&lookup, "EOS_STRICT_VALUES", defaults.strict_values),
            allowed_extensions: lookup("EOS_ALLOWED_EXTENSIONS")
                .map(|list| extensions(&list))
                .unwrap_or(defaults.allowed_extensions),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn import_settings(&self) -> ImportSettings {
        ImportSettings {
            upload_dir: self.upload_dir.clone(),
            batch_size: self.batch_size,
            value_mode: if self.strict_values {
                ValueMode::Strict
            } else {
                ValueMode::Lenient
            },
            allowed_extensions: self.allowed_extensions.clone(),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid value '{}' for {}", raw, key);
                default
            }
        },
    }
}

fn extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
