//! Server configuration.
//!
//! Resolution order for each setting:
//! 1. Command-line argument or its environment variable
//! 2. TOML file given by `--config` / `SHOPFLOOR_CONFIG`
//! 3. Compiled default
//!
//! Example file:
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8000
//! database = "/var/lib/shopfloor/shopfloor.sqlite"
//!
//! [[api_tokens]]
//! token = "change-me"
//! role = "admin"
//! ```

use crate::auth::{AccessTokens, Role};
use crate::error::{AppError, AppResult};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE: &str = "shopfloor.sqlite";

#[derive(Debug, Parser)]
#[command(name = "shopfloor", version, about = "Shop-floor work tracking server")]
pub struct Args {
    /// TOML configuration file
    #[arg(long, env = "SHOPFLOOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "SHOPFLOOR_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "SHOPFLOOR_PORT")]
    pub port: Option<u16>,

    /// SQLite database file, created on first start
    #[arg(long, env = "SHOPFLOOR_DATABASE")]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiToken {
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    pub api_tokens: Vec<ApiToken>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: PathBuf::from(DEFAULT_DATABASE),
            api_tokens: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load(args: &Args) -> AppResult<Self> {
        let mut settings = match &args.config {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    AppError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        if let Some(host) = &args.host {
            settings.host = host.clone();
        }
        if let Some(port) = args.port {
            settings.port = port;
        }
        if let Some(database) = &args.database {
            settings.database = database.clone();
        }
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
        if settings.api_tokens.iter().any(|t| t.token.trim().is_empty()) {
            return Err(AppError::Config("api token must not be empty".into()));
        }
        Ok(settings)
    }

    pub fn access_tokens(&self) -> AccessTokens {
        AccessTokens::new(
            self.api_tokens
                .iter()
                .map(|t| (t.token.clone(), t.role)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_args() -> Args {
        Args {
            config: None,
            host: None,
            port: None,
            database: None,
        }
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = Settings::load(&no_args()).unwrap();
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.database, PathBuf::from(DEFAULT_DATABASE));
        assert!(settings.access_tokens().is_open());
    }

    #[test]
    fn file_values_and_tokens_are_read() {
        let settings = Settings::from_toml_str(
            r#"
            port = 9100

            [[api_tokens]]
            token = "abc"
            role = "chefe"
            "#,
        )
        .unwrap();
        assert_eq!(settings.port, 9100);
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.access_tokens().role_for("abc"), Some(Role::Chefe));
    }

    #[test]
    fn flags_override_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopfloor.toml");
        fs::write(&path, "host = \"0.0.0.0\"\nport = 9000\n").unwrap();

        let args = Args {
            config: Some(path),
            port: Some(9200),
            ..no_args()
        };
        let settings = Settings::load(&args).unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 9200);
    }

    #[test]
    fn unknown_role_is_a_config_error() {
        let err = Settings::from_toml_str("[[api_tokens]]\ntoken = \"x\"\nrole = \"guest\"\n")
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
