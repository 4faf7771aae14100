//! Run configuration loaded from TOML.
//!
//! Every section has defaults, so a missing file or a partial file is fine.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::census::CountyVariable;
use crate::models::AdminLevel;
use crate::overpass::{AreaQuery, RetryPolicy};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub overpass: OverpassConfig,
    pub census: CensusConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    /// Transport timeout per HTTP request
    pub request_timeout_secs: u64,
    /// Server-side timeout embedded in DED queries
    pub ded_query_timeout_secs: u64,
    /// Server-side timeout embedded in townland queries
    pub townland_query_timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            request_timeout_secs: 120,
            ded_query_timeout_secs: 30,
            townland_query_timeout_secs: 45,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CensusConfig {
    pub endpoint: String,
    pub dataset: String,
    pub county_variable: String,
    pub request_timeout_secs: u64,
}

impl Default for CensusConfig {
    fn default() -> Self {
        let variable = CountyVariable::default();
        Self {
            endpoint: "https://api-ext.ireland-census-preview.cantabular.com/graphql".to_string(),
            dataset: variable.dataset,
            county_variable: variable.variable,
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    /// Wait after a 429 / 504 response
    pub cooldown_secs: u64,
    /// Wait between areas, whatever the outcome
    pub pacing_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            cooldown_secs: 600,
            pacing_secs: 20,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub deds: PathBuf,
    pub townlands: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            deds: PathBuf::from("./out/deds.geojson"),
            townlands: PathBuf::from("./out/townlands.geojson"),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.overpass.endpoint)
            .with_context(|| format!("Invalid Overpass endpoint: {}", self.overpass.endpoint))?;
        Url::parse(&self.census.endpoint)
            .with_context(|| format!("Invalid census endpoint: {}", self.census.endpoint))?;
        if self.retry.max_attempts == 0 {
            anyhow::bail!("retry.max_attempts must be at least 1");
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            cooldown: Duration::from_secs(self.retry.cooldown_secs),
        }
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_secs(self.retry.pacing_secs)
    }

    pub fn overpass_request_timeout(&self) -> Duration {
        Duration::from_secs(self.overpass.request_timeout_secs)
    }

    pub fn census_request_timeout(&self) -> Duration {
        Duration::from_secs(self.census.request_timeout_secs)
    }

    pub fn county_variable(&self) -> CountyVariable {
        CountyVariable {
            dataset: self.census.dataset.clone(),
            variable: self.census.county_variable.clone(),
        }
    }

    /// Query for every DED in a county area
    pub fn ded_query(&self, county: &str) -> AreaQuery {
        AreaQuery::new(
            county,
            AdminLevel::ElectoralDivision,
            Duration::from_secs(self.overpass.ded_query_timeout_secs),
        )
    }

    /// Query for every townland in a county area
    pub fn townland_query(&self, county: &str) -> AreaQuery {
        AreaQuery::new(
            county,
            AdminLevel::Townland,
            Duration::from_secs(self.overpass.townland_query_timeout_secs),
        )
    }
}
