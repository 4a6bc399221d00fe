use std::env;
use std::time::Duration;

use hydrant_core::{AppError, AppResult};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.firehydrant.io/v1/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("FIREHYDRANT_API_KEY")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Validation("FIREHYDRANT_API_KEY is required".to_owned()))?;

        let base_url = lookup("FIREHYDRANT_BASE_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let base_url = parse_base_url(base_url.as_str())?;

        let request_timeout_secs = match lookup("FIREHYDRANT_REQUEST_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid FIREHYDRANT_REQUEST_TIMEOUT_SECS '{value}': {error}"
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        if request_timeout_secs == 0 {
            return Err(AppError::Validation(
                "FIREHYDRANT_REQUEST_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_key,
            base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

fn parse_base_url(value: &str) -> AppResult<Url> {
    let mut base_url = Url::parse(value).map_err(|error| {
        AppError::Validation(format!("invalid FIREHYDRANT_BASE_URL '{value}': {error}"))
    })?;

    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "FIREHYDRANT_BASE_URL must use http or https, got '{}'",
            base_url.scheme()
        )));
    }

    // Relative joins keep the version prefix only with a trailing slash.
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(path.as_str());
    }

    Ok(base_url)
}
