//! Client configuration sourced from code or the process environment.

use crate::client::RmsClient;
use crate::envelope::DEFAULT_BASE_URL;
use crate::error::ApiError;

pub const ENV_BASE_URL: &str = "RMS_BASE_URL";
pub const ENV_SERVICE_SECRET: &str = "SERVICE_SECRET";
pub const ENV_LICENSE_KEY: &str = "LICENSE_KEY";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub service_secret: String,
    pub license_key: String,
}

impl ClientConfig {
    pub fn new(service_secret: impl Into<String>, license_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            service_secret: service_secret.into(),
            license_key: license_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `SERVICE_SECRET`, `LICENSE_KEY` and optionally `RMS_BASE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Config(format!("{name} is not set")))
        };
        let config = Self::new(required(ENV_SERVICE_SECRET)?, required(ENV_LICENSE_KEY)?);
        Ok(match lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            Some(url) => config.with_base_url(url),
            None => config,
        })
    }

    /// An initialized client for this configuration.
    pub fn client(&self) -> Result<RmsClient, ApiError> {
        RmsClient::new(&self.base_url).initialize(&self.service_secret, &self.license_key)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("service_secret", &"***")
            .field("license_key", &"***")
            .finish()
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_production_host() {
        let config =
            ClientConfig::from_lookup(lookup(&[("SERVICE_SECRET", "s"), ("LICENSE_KEY", "k")])).unwrap();
        assert_eq!(config.base_url, "https://api.rms.rakuten.co.jp");
        assert!(config.client().unwrap().is_initialized());
    }

    #[test]
    fn base_url_override() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SERVICE_SECRET", "s"),
            ("LICENSE_KEY", "k"),
            ("RMS_BASE_URL", "http://127.0.0.1:3000"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn missing_credential_is_a_config_error() {
        let err = ClientConfig::from_lookup(lookup(&[("SERVICE_SECRET", "s")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: LICENSE_KEY is not set");

        let err = ClientConfig::from_lookup(lookup(&[("SERVICE_SECRET", ""), ("LICENSE_KEY", "k")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn debug_hides_credentials() {
        let rendered = format!("{:?}", ClientConfig::new("top-secret", "license"));
        assert!(!rendered.contains("top-secret"));
        assert!(!rendered.contains("license\""));
    }
}
