use crate::error::FetchError;
use std::env;
use std::fmt;

/// Bearer token for the loss API. Only ever rendered into the `Authorization` header.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn from_env(var: &str) -> Result<Self, FetchError> {
        match env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self(token)),
            _ => Err(FetchError::MissingCredential(var.to_string())),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
