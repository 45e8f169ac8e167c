use std::time::Duration;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

pub const BASE_URL_ENV: &str = "RIPPLETIDE_BASE_URL";
pub const API_KEY_ENV: &str = "RIPPLETIDE_API_KEY";
pub const SESSION_ID_ENV: &str = "RIPPLETIDE_SESSION_ID";
pub const TIMEOUT_ENV: &str = "RIPPLETIDE_TIMEOUT_SECONDS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub session_id: Option<String>,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            session_id: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `RIPPLETIDE_*` variables from the process environment.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = match var(TIMEOUT_ENV) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ClientError::config(format!("{TIMEOUT_ENV} must be whole seconds, got {raw:?}"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            base_url: var(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: var(API_KEY_ENV),
            session_id: var(SESSION_ID_ENV),
            timeout,
        })
    }
}

pub(crate) fn normalize_base_url(value: &str) -> String {
    value.trim_end_matches('/').to_string()
}
