use std::net::SocketAddr;
use std::path::PathBuf;

use crate::qa::model::ModelKind;

/// Application-level constants
pub const APP_NAME: &str = "docqa";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registry entry the predict endpoint is wired to.
pub const DEFAULT_MODEL: &str = "extractive_text";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,docqa=info".to_string()
}

/// Default location for source PDFs: ~/docqa/data
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("docqa").join("data"))
}

/// Service configuration, read once at startup.
///
/// A missing data directory does not fail startup — it degrades every model
/// variant that needs documents (the variant is registered but unusable).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: Option<PathBuf>,
    pub bind_addr: String,
    pub port: u16,
    pub enabled_models: Vec<ModelKind>,
    pub generator_url: String,
    pub generator_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            bind_addr: "127.0.0.1".to_string(),
            port: 5000,
            enabled_models: vec![ModelKind::ExtractiveText],
            generator_url: "http://localhost:11434".to_string(),
            generator_model: "qa-generator".to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `DOCQA_DATA_DIR` points at the PDF directory; when unset, the default
    /// location is used only if it already exists on disk.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let data_dir = std::env::var("DOCQA_DATA_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| default_data_dir().filter(|d| d.is_dir()));

        let bind_addr = std::env::var("DOCQA_BIND").unwrap_or(defaults.bind_addr);
        let port = std::env::var("DOCQA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let generator_url =
            std::env::var("DOCQA_GENERATOR_URL").unwrap_or(defaults.generator_url);
        let generator_model =
            std::env::var("DOCQA_GENERATOR_MODEL").unwrap_or(defaults.generator_model);

        Self {
            data_dir,
            bind_addr,
            port,
            enabled_models: defaults.enabled_models,
            generator_url,
            generator_model,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind_addr, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_extractive_text_only() {
        let config = AppConfig::default();
        assert_eq!(config.enabled_models, vec![ModelKind::ExtractiveText]);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn default_socket_addr_parses() {
        let config = AppConfig::default();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        let config = AppConfig {
            bind_addr: "not-an-address".into(),
            ..AppConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn default_data_dir_under_home() {
        if let Some(dir) = default_data_dir() {
            let home = dirs::home_dir().unwrap();
            assert!(dir.starts_with(home));
            assert!(dir.ends_with("docqa/data"));
        }
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
