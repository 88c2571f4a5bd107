use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:1111";
pub const DEFAULT_TOKEN_PATH: &str = "./var/.auth_token";

pub const ENV_API_BASE_URL: &str = "CHIRPER_API_BASE_URL";
pub const ENV_TOKEN_PATH: &str = "CHIRPER_TOKEN_PATH";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub api_base_url: String,
    pub token_path: PathBuf,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
        }
    }
}

impl UserConfig {
    /// Reads the environment (call `dotenvy::dotenv()` first if `.env` should count). Unset or
    /// empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            api_base_url: non_empty(ENV_API_BASE_URL).unwrap_or(defaults.api_base_url),
            token_path: non_empty(ENV_TOKEN_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
        }
    }

    pub fn with_overrides(mut self, api_base_url: Option<String>, token_path: Option<PathBuf>) -> Self {
        if let Some(api_base_url) = api_base_url {
            self.api_base_url = api_base_url;
        }
        if let Some(token_path) = token_path {
            self.token_path = token_path;
        }
        self
    }
}
