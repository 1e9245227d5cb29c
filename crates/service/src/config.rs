use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub concurrency: ConcurrencyConfig,
    pub press: PressConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 3000, max_request_size_mb: 32 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub max_sync_requests: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { max_sync_requests: 8 }
    }
}

/// Post-processing tool settings. The Ghostscript binary is probed at
/// startup and by `/health`; a missing binary degrades CMYK requests
/// to RGB output rather than failing them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PressConfig {
    pub ghostscript_binary: PathBuf,
    pub icc_profile: Option<PathBuf>,
    pub conversion_timeout_secs: u64,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            ghostscript_binary: PathBuf::from("gs"),
            icc_profile: None,
            conversion_timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Try config file locations in order of preference
        let config_candidates = ["config/default", "crates/service/config/default"];

        let mut builder = config::Config::builder();

        // Explicit path override wins
        if let Ok(config_path) = std::env::var("PLATEN_CONFIG") {
            if !config_path.is_empty() {
                let config_file = format!("{}.toml", config_path);
                if std::path::Path::new(&config_file).exists() {
                    builder = builder.add_source(config::File::with_name(&config_path));
                }
            }
        } else {
            for path in &config_candidates {
                let config_file = format!("{}.toml", path);
                if std::path::Path::new(&config_file).exists() {
                    builder = builder.add_source(config::File::with_name(path));
                    break;
                }
            }
        }

        // Environment variables layer on top of any file
        builder = builder.add_source(config::Environment::with_prefix("PLATEN").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// Ghostscript settings in the form the press stage consumes.
    pub fn ghostscript(&self) -> platen::GhostscriptConfig {
        platen::GhostscriptConfig {
            binary: self.press.ghostscript_binary.clone(),
            icc_profile: self.press.icc_profile.clone(),
            timeout: Duration::from_secs(self.press.conversion_timeout_secs),
        }
    }

    pub fn api_key() -> String {
        std::env::var("API_KEY").unwrap_or_else(|_| "dev-secret-key".to_string())
    }
}
