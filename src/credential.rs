use std::env;

use crate::error::{CmqError, Result};

/// Environment variable holding the SecretId.
pub const ENV_SECRET_ID: &str = "TENCENTCLOUD_SECRET_ID";
/// Environment variable holding the SecretKey.
pub const ENV_SECRET_KEY: &str = "TENCENTCLOUD_SECRET_KEY";

/// Tencent Cloud API key pair.
///
/// The `Debug` implementation redacts `secret_key` to prevent
/// accidental leakage in logs.
#[derive(Clone)]
pub struct Credential {
    pub secret_id: String,
    pub secret_key: String,
}

impl Credential {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Reads `TENCENTCLOUD_SECRET_ID` and `TENCENTCLOUD_SECRET_KEY`.
    pub fn from_env() -> Result<Self> {
        let credential = Self::from_lookup(|name| env::var(name).ok())?;
        tracing::debug!(secret_id = %credential.secret_id, "credential loaded from environment");
        Ok(credential)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let id = lookup(ENV_SECRET_ID)
            .ok_or_else(|| CmqError::Credential(format!("{} not set", ENV_SECRET_ID)))?;
        let key = lookup(ENV_SECRET_KEY)
            .ok_or_else(|| CmqError::Credential(format!("{} not set", ENV_SECRET_KEY)))?;

        if id.is_empty() || key.is_empty() {
            return Err(CmqError::Credential(format!(
                "{} or {} is empty",
                ENV_SECRET_ID, ENV_SECRET_KEY
            )));
        }

        Ok(Self::new(id, key))
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"****")
            .finish()
    }
}
