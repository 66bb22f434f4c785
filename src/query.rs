use crate::error::FetchError;
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml;

pub const DEFAULT_ENDPOINT: &str = "https://api.globalforestwatch.org/v1/loss";
pub const DEFAULT_OUTPUT: &str = "forest_loss_india_2000_2023.geojson";
pub const DEFAULT_TOKEN_ENV: &str = "GFW_API_TOKEN";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything one pull needs apart from the secret: where to ask, what to ask for and where
/// to put the answer. Read from TOML, with CLI overrides applied on top.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LossQuery {
    pub endpoint: String,
    pub bbox: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub fn loss_query_toml() -> toml::Table {
    toml::toml! {
        endpoint = "https://api.globalforestwatch.org/v1/loss"

        // India
        bbox = "68.0,6.5,97.0,37.0"

        start_date = "2000-01-01"
        end_date = "2023-01-01"

        output = "forest_loss_india_2000_2023.geojson"

        token_env = "GFW_API_TOKEN"

        timeout_secs = 120
    }
}

impl Default for LossQuery {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bbox: "68.0,6.5,97.0,37.0".to_string(),
            start_date: "2000-01-01".to_string(),
            end_date: "2023-01-01".to_string(),
            output: default_output(),
            token_env: default_token_env(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LossQuery {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let query: Self = toml::from_str(&content)?;
        Ok(query)
    }

    pub fn write<P: AsRef<Path>>(self: &Self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_template(table: &toml::Table) -> Result<Self> {
        let query: Self = toml::from_str(&table.to_string())?;
        Ok(query)
    }

    /// Query string pairs in the order they are sent. Values are passed through untouched.
    pub fn params(&self) -> [(&str, &str); 3] {
        [
            ("bbox", self.bbox.as_str()),
            ("start_date", self.start_date.as_str()),
            ("end_date", self.end_date.as_str()),
        ]
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        parse_bbox(&self.bbox)?;
        if self.timeout_secs == 0 {
            return Err(FetchError::InvalidTimeout);
        }
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        if start > end {
            return Err(FetchError::InvalidDateRange {
                start: self.start_date.clone(),
                end: self.end_date.clone(),
            });
        }
        url::Url::parse(&self.endpoint)
            .map_err(|e| FetchError::InvalidEndpoint(self.endpoint.clone(), e))?;
        Ok(())
    }
}

/// West, south, east, north.
pub fn parse_bbox(bbox: &str) -> Result<[f64; 4], FetchError> {
    let invalid = || FetchError::InvalidBoundingBox(bbox.to_string());

    let values = bbox
        .split(',')
        .map(|v| v.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    values.try_into().map_err(|_| invalid())
}

/// Strict `YYYY-MM-DD`: the text must be exactly what the parsed date formats back to.
pub fn parse_date(date: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .filter(|parsed| parsed.format(DATE_FORMAT).to_string() == date)
        .ok_or_else(|| FetchError::InvalidDate(date.to_string()))
}
