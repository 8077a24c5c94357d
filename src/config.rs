// src/config.rs
use crate::application::services::PaginationLimits;
use std::env;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    listen_addr: String,
    allowed_origins: Vec<String>,
    search_per_page: u32,
    search_max_per_page: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8888".into()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:4200".into()]
}

const DEFAULT_PER_PAGE: u32 = 10;
const DEFAULT_MAX_PER_PAGE: u32 = 100;

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_count(key: &str, raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u32>() {
            Ok(0) | Err(_) => Err(ConfigError::Invalid(format!(
                "{key} must be a positive integer, got `{value}`"
            ))),
            Ok(n) => Ok(n),
        },
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            allowed_origins: default_allowed_origins(),
            search_per_page: DEFAULT_PER_PAGE,
            search_max_per_page: DEFAULT_MAX_PER_PAGE,
        }
    }
}

impl AppConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(default_listen_addr);
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_else(default_allowed_origins);

        let search_per_page = parse_count(
            "SEARCH_PER_PAGE",
            lookup("SEARCH_PER_PAGE"),
            DEFAULT_PER_PAGE,
        )?;
        let search_max_per_page = parse_count(
            "SEARCH_MAX_PER_PAGE",
            lookup("SEARCH_MAX_PER_PAGE"),
            DEFAULT_MAX_PER_PAGE,
        )?;

        if search_per_page > search_max_per_page {
            return Err(ConfigError::Invalid(format!(
                "SEARCH_PER_PAGE ({search_per_page}) exceeds SEARCH_MAX_PER_PAGE ({search_max_per_page})"
            )));
        }

        Ok(Self {
            listen_addr,
            allowed_origins,
            search_per_page,
            search_max_per_page,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub fn limits(&self) -> PaginationLimits {
        PaginationLimits {
            default_per_page: self.search_per_page,
            max_per_page: self.search_max_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.listen_addr(), "127.0.0.1:8888");
        assert_eq!(config.limits().default_per_page, 10);
        assert_eq!(config.limits().max_per_page, 100);
    }

    #[test]
    fn reads_origins_and_limits() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("SEARCH_PER_PAGE", "25"),
            ("SEARCH_MAX_PER_PAGE", "50"),
        ]))
        .unwrap();
        assert_eq!(config.allowed_origins(), ["http://a.test", "http://b.test"]);
        assert_eq!(config.limits().default_per_page, 25);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("SEARCH_PER_PAGE", "many")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("SEARCH_MAX_PER_PAGE", "0")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[
                ("SEARCH_PER_PAGE", "20"),
                ("SEARCH_MAX_PER_PAGE", "5"),
            ])),
            Err(ConfigError::Invalid(_))
        ));
    }
}
