use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Remote,
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "remote" => Ok(Backend::Remote),
            other => bail!("Unknown backend '{}', expected 'memory' or 'remote'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub backend: Backend,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: var("STAYHUB_PORT", "18480")
                .parse()
                .context("STAYHUB_PORT must be a port number")?,
            host: var("STAYHUB_HOST", "0.0.0.0"),
            backend: var("STAYHUB_BACKEND", "memory").parse()?,
            api_base_url: var("STAYHUB_API_BASE_URL", "http://localhost:8000/api"),
            api_timeout: Duration::from_secs(
                var("STAYHUB_API_TIMEOUT_SECS", "10")
                    .parse()
                    .context("STAYHUB_API_TIMEOUT_SECS must be a number of seconds")?,
            ),
            seed_path: lookup("STAYHUB_SEED_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 18480);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.api_timeout, Duration::from_secs(10));
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STAYHUB_PORT", "9000"),
            ("STAYHUB_BACKEND", "Remote"),
            ("STAYHUB_API_TIMEOUT_SECS", "3"),
            ("STAYHUB_SEED_PATH", "/data/listings.json"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.backend, Backend::Remote);
        assert_eq!(config.api_timeout, Duration::from_secs(3));
        assert_eq!(config.seed_path, Some(PathBuf::from("/data/listings.json")));
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("STAYHUB_PORT", "http")]).is_err());
        assert!(config_from(&[("STAYHUB_BACKEND", "postgres")]).is_err());
        assert!(config_from(&[("STAYHUB_API_TIMEOUT_SECS", "-1")]).is_err());
    }

    #[test]
    fn test_blank_seed_path_is_ignored() {
        let config = config_from(&[("STAYHUB_SEED_PATH", "  ")]).unwrap();
        assert!(config.seed_path.is_none());
    }
}
