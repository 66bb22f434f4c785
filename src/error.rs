use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Environment variable '{0}' holding the API token is missing or empty")]
    MissingCredential(String),

    #[error("Invalid bounding box '{0}': expected four decimals 'west,south,east,north'")]
    InvalidBoundingBox(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Request timeout must be at least one second")]
    InvalidTimeout,

    #[error("Invalid endpoint url '{0}'")]
    InvalidEndpoint(String, #[source] url::ParseError),

    #[error("Response body with status 200 is not valid JSON")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Failed to write output file '{0}'")]
    WriteOutput(PathBuf, #[source] std::io::Error),
}
