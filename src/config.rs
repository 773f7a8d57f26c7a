use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DatabaseConfig {
    Postgres { dsn: String },
    /// Process-local storage, lost on restart
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the auth provider, without the `/auth/v1` suffix
    pub url: String,
    pub anon_key: String,
}

const fn default_secure_cookies() -> bool {
    true
}

pub fn parse_yaml(contents: &str) -> Result<Config, Box<dyn std::error::Error>> {
    serde_yaml::from_str(contents).map_err(Into::into)
}

fn load_from_env(
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let port = var("PORT")
        .unwrap_or_else(|| "8000".to_string())
        .parse::<u16>()
        .map_err(|e| format!("Failed to parse PORT: {e}"))?;

    let database = match var("DATABASE").as_deref() {
        Some("memory") => DatabaseConfig::Memory,
        _ => DatabaseConfig::Postgres {
            dsn: var("PG_DSN").ok_or("PG_DSN environment variable is required")?,
        },
    };

    let auth = AuthConfig {
        url: var("AUTH_URL").ok_or("AUTH_URL environment variable is required")?,
        anon_key: var("AUTH_ANON_KEY").ok_or("AUTH_ANON_KEY environment variable is required")?,
    };

    let secure_cookies = match var("SECURE_COOKIES") {
        Some(value) => value
            .parse::<bool>()
            .map_err(|e| format!("Failed to parse SECURE_COOKIES: {e}"))?,
        None => default_secure_cookies(),
    };

    Ok(Config {
        port,
        database,
        auth,
        secure_cookies,
    })
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_PORTAL_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return parse_yaml(&fs::read_to_string(&config_path)?);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return parse_yaml(&fs::read_to_string("config.yaml")?);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return parse_yaml(&fs::read_to_string("config.example.yaml")?);
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_env(|key| env::var(key).ok()).map_err(|e| {
        format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}
