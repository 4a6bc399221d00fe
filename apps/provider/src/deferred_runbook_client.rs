use async_trait::async_trait;
use hydrant_application::RunbookClient;
use hydrant_core::{AppError, AppResult, RequestContext};
use hydrant_domain::Runbook;
use hydrant_infrastructure::HttpRunbookClient;
use tokio::sync::OnceCell;
use tracing::info;

use crate::provider_config::ProviderConfig;

/// Runbook client that loads configuration and connects on first fetch.
///
/// Commands that never fetch, such as `schema`, need no credentials.
pub struct DeferredRunbookClient {
    load_config: fn() -> AppResult<ProviderConfig>,
    client: OnceCell<HttpRunbookClient>,
}

impl DeferredRunbookClient {
    pub fn new(load_config: fn() -> AppResult<ProviderConfig>) -> Self {
        Self {
            load_config,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> AppResult<&HttpRunbookClient> {
        self.client
            .get_or_try_init(|| async { connect((self.load_config)()?) })
            .await
    }
}

fn connect(config: ProviderConfig) -> AppResult<HttpRunbookClient> {
    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        base_url = %config.base_url,
        request_timeout_secs = config.request_timeout.as_secs(),
        "FireHydrant client configured"
    );

    HttpRunbookClient::new(http_client, config.base_url, config.api_key)
}

#[async_trait]
impl RunbookClient for DeferredRunbookClient {
    async fn fetch_runbook(
        &self,
        context: &RequestContext,
        runbook_id: &str,
    ) -> AppResult<Runbook> {
        self.client().await?.fetch_runbook(context, runbook_id).await
    }
}
