// ============================================================
// CONFIGURATION
// ============================================================
// Defaults, overridable by sitemapgen.toml and SITEMAPGEN_* env
// vars. Zero configuration must yield a runnable local server.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "sitemapgen.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bind address; this is a local tool, keep it loopback.
    pub host: String,
    pub port: u16,

    /// Root for the uploads, output folders and reports.
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            data_dir: ".".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("SITEMAPGEN_"))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, ".");
    }

    #[test]
    fn test_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SITEMAPGEN_PORT", "5001");
            let config = AppConfig::load().unwrap();
            assert_eq!(config.port, 5001);
            assert_eq!(config.host, "127.0.0.1");
            Ok(())
        });
    }

    #[test]
    fn test_toml_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "port = 8080\ndata_dir = \"out\"")?;
            let config = AppConfig::load().unwrap();
            assert_eq!(config.port, 8080);
            assert_eq!(config.data_dir, "out");
            Ok(())
        });
    }
}
