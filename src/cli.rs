use crate::query::LossQuery;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Pull tree cover loss for a bounding box and date range, and save the response as GeoJSON.
///
/// The API token is read from the environment variable named by `--token-env`.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// TOML file with the query; flags below override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// west,south,east,north
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,

    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long, value_name = "VAR")]
    pub token_env: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Write the default query as TOML to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub write_template: Option<PathBuf>,
}

impl Args {
    /// Config file (or the built-in defaults) with any flags layered on top.
    pub fn resolve(self: &Self) -> Result<LossQuery> {
        let mut query = match &self.config {
            Some(path) => LossQuery::read(path)?,
            None => LossQuery::default(),
        };

        if let Some(bbox) = &self.bbox {
            query.bbox = bbox.clone();
        }
        if let Some(start_date) = &self.start_date {
            query.start_date = start_date.clone();
        }
        if let Some(end_date) = &self.end_date {
            query.end_date = end_date.clone();
        }
        if let Some(output) = &self.output {
            query.output = output.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            query.endpoint = endpoint.clone();
        }
        if let Some(token_env) = &self.token_env {
            query.token_env = token_env.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            query.timeout_secs = timeout_secs;
        }
        Ok(query)
    }
}
