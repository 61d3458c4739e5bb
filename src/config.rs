//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MODELS_DIR, DEFAULT_PORT, LOCAL_ORIGINS};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory containing the model, scaler and encoding artifacts
    pub models_dir: PathBuf,

    /// Environment (development, production)
    pub environment: String,

    /// Production frontend URL
    pub frontend_url: Option<String>,

    /// Development frontend URL
    pub frontend_dev_url: String,

    /// Blend the model output with the rule-based clinical adjustment
    pub clinical_adjustment: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            environment: "development".to_string(),
            frontend_url: None,
            frontend_dev_url: "http://localhost:3000".to_string(),
            clinical_adjustment: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            models_dir: env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            frontend_url: env::var("FRONTEND_URL")
                .ok()
                .filter(|url| !url.is_empty()),

            frontend_dev_url: env::var("FRONTEND_DEV_URL")
                .unwrap_or(defaults.frontend_dev_url),

            clinical_adjustment: env::var("CLINICAL_ADJUSTMENT")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.clinical_adjustment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Development mode accepts requests from any origin
    pub fn allow_all_origins(&self) -> bool {
        self.environment == "development"
    }

    /// Origins accepted by CORS outside development mode
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();

        if let (true, Some(url)) = (self.is_production(), self.frontend_url.as_deref()) {
            origins.push(url.to_string());
            if let Some(rest) = url.strip_prefix("http://") {
                origins.push(format!("https://{}", rest));
            } else if let Some(rest) = url.strip_prefix("https://") {
                origins.push(format!("http://{}", rest));
            }
            origins.push("http://localhost:3000".to_string());
            origins.push("http://localhost:8000".to_string());
        } else {
            origins.extend(LOCAL_ORIGINS.iter().map(|o| o.to_string()));
            origins.push(self.frontend_dev_url.clone());
        }

        let mut seen = std::collections::HashSet::new();
        origins.retain(|o| seen.insert(o.clone()));
        origins
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert!(config.allow_all_origins());
        assert!(config.clinical_adjustment);
    }

    #[test]
    fn test_production_origins_include_both_schemes() {
        let config = Config {
            environment: "production".to_string(),
            frontend_url: Some("https://cardio.example.org".to_string()),
            ..Default::default()
        };

        let origins = config.allowed_origins();
        assert!(!config.allow_all_origins());
        assert!(origins.contains(&"https://cardio.example.org".to_string()));
        assert!(origins.contains(&"http://cardio.example.org".to_string()));
        assert!(origins.contains(&"http://localhost:3000".to_string()));
        assert!(!origins.contains(&"http://localhost:5173".to_string()));
    }

    #[test]
    fn test_dev_origins_deduplicated() {
        let config = Config {
            environment: "staging".to_string(),
            ..Default::default()
        };

        let origins = config.allowed_origins();
        let count = origins.iter().filter(|o| *o == "http://localhost:3000").count();
        assert_eq!(count, 1);
        assert_eq!(origins.len(), LOCAL_ORIGINS.len());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("maybe"), None);
    }
}
