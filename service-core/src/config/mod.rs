//! Shared configuration loading.
//!
//! Services layer their own settings on top of [`Config`], pulling single
//! values through [`get_env`]/[`parse_env`]. In prod every variable must
//! be set explicitly; defaults are a dev convenience only.

use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Deployment environment. Controls whether missing variables may fall
/// back to defaults.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    /// Read `ENVIRONMENT`, defaulting to dev when unset.
    pub fn from_env() -> Result<Self, AppError> {
        env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))
    }

    pub fn is_prod(self) -> bool {
        self == Environment::Prod
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Read an environment variable. Defaults are honored in dev only.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(v) => Ok(v),
        Err(_) => match default {
            Some(d) if !is_prod => Ok(d.to_string()),
            _ => Err(AppError::ConfigError(anyhow::anyhow!(
                "Missing required environment variable: {}",
                key
            ))),
        },
    }
}

/// [`get_env`] followed by a parse into the target type.
pub fn parse_env<T>(key: &str, default: Option<&str>, is_prod: bool) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, default, is_prod)?
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Dev));
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Prod));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn defaults_are_rejected_in_prod() {
        assert!(get_env("CORE_CONFIG_TEST_UNSET", Some("fallback"), true).is_err());
        assert_eq!(
            get_env("CORE_CONFIG_TEST_UNSET", Some("fallback"), false).unwrap(),
            "fallback"
        );
    }

    #[test]
    fn parse_env_reports_bad_values() {
        assert_eq!(
            parse_env::<u32>("CORE_CONFIG_TEST_UNSET", Some("42"), false).unwrap(),
            42
        );
        assert!(parse_env::<u32>("CORE_CONFIG_TEST_UNSET", Some("not-a-number"), false).is_err());
    }
}
