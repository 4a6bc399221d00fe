use async_trait::async_trait;
use hydrant_application::RunbookClient;
use hydrant_core::{AppError, AppResult, RequestContext};
use hydrant_domain::{Runbook, RunbookInput, RunbookOwner};
use reqwest::{StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;


const USER_AGENT: &str = concat!("hydrant-provider/", env!("CARGO_PKG_VERSION"));

/// FireHydrant REST API client for runbook lookups.
pub struct HttpRunbookClient {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct RunbookResponse {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    owner: Option<RunbookOwner>,
    #[serde(default)]
    attachment_rule: Value,
}

impl HttpRunbookClient {
    /// Creates a client rooted at `base_url`, e.g. `https://api.firehydrant.io/v1/`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: Url,
        api_key: impl Into<String>,
    ) -> AppResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "FireHydrant base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn runbook_url(&self, runbook_id: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "FireHydrant base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("runbooks")
            .push(runbook_id);

        Ok(url)
    }

    async fn get_runbook(&self, runbook_id: &str) -> AppResult<Runbook> {
        let endpoint = self.runbook_url(runbook_id)?;
        debug!(runbook_id, endpoint = %endpoint, "requesting runbook");

        let response = self
            .http_client
            .get(endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|error| {
                AppError::Transport(format!("failed to call FireHydrant runbooks API: {error}"))
            })?;

        let status = response.status();
        debug!(runbook_id, status = status.as_u16(), "FireHydrant responded");

        match status {
            StatusCode::NOT_FOUND => {
                return Err(AppError::NotFound(format!(
                    "runbook '{runbook_id}' was not found"
                )));
            }
            StatusCode::UNAUTHORIZED => {
                return Err(AppError::Unauthorized(
                    "FireHydrant rejected the API key".to_owned(),
                ));
            }
            StatusCode::FORBIDDEN => {
                return Err(AppError::Forbidden(format!(
                    "API key may not read runbook '{runbook_id}'"
                )));
            }
            status if !status.is_success() => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<body unavailable>".to_owned());
                return Err(AppError::Internal(format!(
                    "FireHydrant runbooks API returned status {}: {body}",
                    status.as_u16()
                )));
            }
            _ => {}
        }

        let body = response.json::<RunbookResponse>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to parse FireHydrant runbook response body: {error}"
            ))
        })?;

        body.try_into_runbook()
    }
}

impl RunbookResponse {
    fn try_into_runbook(self) -> AppResult<Runbook> {
        Runbook::new(RunbookInput {
            id: self.id,
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            owner: self.owner,
            attachment_rule: self.attachment_rule,
        })
        .map_err(|error| {
            AppError::Internal(format!("FireHydrant returned an invalid runbook: {error}"))
        })
    }
}

#[async_trait]
impl RunbookClient for HttpRunbookClient {
    async fn fetch_runbook(
        &self,
        context: &RequestContext,
        runbook_id: &str,
    ) -> AppResult<Runbook> {
        context.run(self.get_runbook(runbook_id)).await
    }
}
