use std::collections::HashMap;

use async_trait::async_trait;
use hydrant_application::RunbookClient;
use hydrant_core::{AppError, AppResult, RequestContext};
use hydrant_domain::Runbook;

/// In-memory runbook client keyed by runbook identifier.
#[derive(Debug, Default)]
pub struct InMemoryRunbookClient {
    runbooks: HashMap<String, Runbook>,
}

impl InMemoryRunbookClient {
    /// Creates a client preloaded with `runbooks`.
    #[must_use]
    pub fn with_runbooks(runbooks: impl IntoIterator<Item = Runbook>) -> Self {
        Self {
            runbooks: runbooks
                .into_iter()
                .map(|runbook| (runbook.id().as_str().to_owned(), runbook))
                .collect(),
        }
    }
}

#[async_trait]
impl RunbookClient for InMemoryRunbookClient {
    async fn fetch_runbook(
        &self,
        context: &RequestContext,
        runbook_id: &str,
    ) -> AppResult<Runbook> {
        context
            .run(async {
                self.runbooks
                    .get(runbook_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::NotFound(format!("runbook '{runbook_id}' was not found"))
                    })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use hydrant_application::RunbookClient;
    use hydrant_core::{AppError, RequestContext};
    use hydrant_domain::{Runbook, RunbookInput};
    use serde_json::json;

    use super::InMemoryRunbookClient;

    fn runbook(id: &str) -> Runbook {
        Runbook::new(RunbookInput {
            id: id.to_owned(),
            name: "Deploy Rollback".to_owned(),
            description: "Auto rollback".to_owned(),
            owner: None,
            attachment_rule: json!({"type": "all"}),
        })
        .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn preloaded_runbook_is_returned() {
        let client = InMemoryRunbookClient::with_runbooks([runbook("rb-001"), runbook("rb-002")]);

        let fetched = client
            .fetch_runbook(&RequestContext::background(), "rb-001")
            .await;

        assert_eq!(fetched, Ok(runbook("rb-001")));
    }

    #[tokio::test]
    async fn unknown_runbook_is_not_found() {
        let client = InMemoryRunbookClient::with_runbooks([runbook("rb-001")]);

        let fetched = client
            .fetch_runbook(&RequestContext::background(), "rb-missing")
            .await;

        assert!(matches!(fetched, Err(AppError::NotFound(message)) if message.contains("rb-missing")));
    }

    #[tokio::test]
    async fn cancelled_context_is_honoured() {
        let client = InMemoryRunbookClient::with_runbooks([runbook("rb-001")]);
        let (context, handle) = RequestContext::cancellable();
        handle.cancel();

        let fetched = client.fetch_runbook(&context, "rb-001").await;

        assert!(matches!(fetched, Err(AppError::Cancelled(_))));
    }
}
