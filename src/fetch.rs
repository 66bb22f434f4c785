use crate::credential::Credential;
use crate::error::FetchError;
use crate::provider::LossApi;
use crate::query::LossQuery;
use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const HTTP_OK: u16 = 200;

/// How a pull ended, once the server has answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Saved { path: PathBuf, features: usize },
    Rejected { status: u16, body: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Saved { path, features } => write!(
                f,
                "Data saved to {}. Features count: {}",
                path.display(),
                features
            ),
            Outcome::Rejected { status, body } => write!(f, "Error: {}, {}", status, body),
        }
    }
}

/// Performs the single request for `query` and writes the body to `query.output` if, and only
/// if, the server answered 200 with valid JSON.
pub async fn fetch_and_save(
    api: &impl LossApi,
    query: &LossQuery,
    credential: &Credential,
) -> Result<Outcome> {
    info!(
        endpoint = %query.endpoint,
        bbox = %query.bbox,
        start_date = %query.start_date,
        end_date = %query.end_date,
        "requesting tree cover loss"
    );
    let response = api.get_loss(query, credential).await?;

    if response.status != HTTP_OK {
        warn!(status = response.status, "loss api rejected the request");
        return Ok(Outcome::Rejected {
            status: response.status,
            body: response.body,
        });
    }

    let data: Value = serde_json::from_str(&response.body).map_err(FetchError::MalformedBody)?;
    write_json(&query.output, &data)?;

    let features = features_count(&data);
    info!(output = %query.output.display(), features, "saved response");
    Ok(Outcome::Saved {
        path: query.output.clone(),
        features,
    })
}

/// Size of the top-level `features` member. Missing or scalar members count as zero, as does a
/// body that is not a JSON object at all; such a body has still been written to the output file.
pub fn features_count(data: &Value) -> usize {
    match data.get("features") {
        Some(Value::Array(features)) => features.len(),
        Some(Value::Object(features)) => features.len(),
        Some(Value::String(features)) => features.chars().count(),
        _ => 0,
    }
}

/// Writes `data` as compact JSON. The content goes to a `.partial` sibling first and is renamed
/// over `output` once complete, so an existing file is replaced whole and a failed write leaves
/// nothing behind.
pub fn write_json(output: &Path, data: &Value) -> Result<(), FetchError> {
    let content = serde_json::to_vec(data).map_err(FetchError::MalformedBody)?;
    let write_err = |e| FetchError::WriteOutput(output.to_path_buf(), e);

    // Make parent directories as necessary
    if let Some(parent_dir) = output.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            fs::create_dir_all(parent_dir).map_err(write_err)?;
        }
    }

    let partial = partial_path(output);
    if let Err(e) = fs::write(&partial, content).and_then(|_| fs::rename(&partial, output)) {
        let _ = fs::remove_file(&partial);
        return Err(write_err(e));
    }
    Ok(())
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}
