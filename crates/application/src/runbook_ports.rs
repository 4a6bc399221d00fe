use async_trait::async_trait;
use hydrant_core::{AppResult, RequestContext};
use hydrant_domain::Runbook;

/// Port for runbook lookups against the FireHydrant API.
#[async_trait]
pub trait RunbookClient: Send + Sync {
    /// Fetches one runbook by identifier.
    ///
    /// Implementations must honour `context` for the duration of the call.
    async fn fetch_runbook(
        &self,
        context: &RequestContext,
        runbook_id: &str,
    ) -> AppResult<Runbook>;
}

/// Destination state of one data source read.
pub trait StateSink: Send {
    /// Stores one attribute value.
    fn set_attribute(&mut self, key: &str, value: &str) -> AppResult<()>;

    /// Stores the resource identifier, finalizing the read.
    fn set_id(&mut self, id: &str);
}
