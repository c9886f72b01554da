use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};

pub const DEFAULT_BASE_URL: &str = "https://www.ratemyprofessors.com";

/// The env vars needed for scraping.
#[derive(Debug, Deserialize)]
pub struct ScrapingEnv {
    rmp_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapingConfig {
    base_url: String,
}

impl ScrapingConfig {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_env = ScrapingEnv::load_from_env()?;
        Ok(Self::from_env(scraping_env))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn from_env(scraping_env: ScrapingEnv) -> Self {
        match scraping_env.rmp_base_url {
            Some(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    // Expects `.env` to have been loaded already, see `main`.
    fn load_from_env() -> anyhow::Result<Self> {
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
