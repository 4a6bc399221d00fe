use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hydrant_core::{AppError, AppResult, RequestContext};
use hydrant_domain::{Runbook, RunbookInput, RunbookOwner};
use serde_json::Value;

use crate::runbook_ports::{RunbookClient, StateSink};

pub(crate) fn runbook(id: &str, name: &str, owner_id: Option<&str>, rule: Value) -> Runbook {
    Runbook::new(RunbookInput {
        id: id.to_owned(),
        name: name.to_owned(),
        description: "Auto rollback".to_owned(),
        owner: owner_id.map(|owner_id| RunbookOwner {
            id: owner_id.to_owned(),
            name: None,
        }),
        attachment_rule: rule,
    })
    .unwrap_or_else(|_| unreachable!())
}

#[derive(Default)]
pub(crate) struct FakeRunbookClient {
    runbooks: HashMap<String, Runbook>,
    calls: AtomicUsize,
}

impl FakeRunbookClient {
    pub(crate) fn with_runbook(mut self, requested_id: &str, runbook: Runbook) -> Self {
        self.runbooks.insert(requested_id.to_owned(), runbook);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RunbookClient for FakeRunbookClient {
    async fn fetch_runbook(
        &self,
        context: &RequestContext,
        runbook_id: &str,
    ) -> AppResult<Runbook> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        context
            .run(async {
                self.runbooks.get(runbook_id).cloned().ok_or_else(|| {
                    AppError::NotFound(format!("runbook '{runbook_id}' was not found"))
                })
            })
            .await
    }
}

#[derive(Default)]
pub(crate) struct RecordingState {
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) id: Option<String>,
    pub(crate) reject_key: Option<&'static str>,
}

impl RecordingState {
    pub(crate) fn rejecting(key: &'static str) -> Self {
        Self {
            reject_key: Some(key),
            ..Self::default()
        }
    }

    pub(crate) fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(stored_key, _)| stored_key == key)
            .map(|(_, value)| value.as_str())
    }
}

impl StateSink for RecordingState {
    fn set_attribute(&mut self, key: &str, value: &str) -> AppResult<()> {
        if self.reject_key == Some(key) {
            return Err(AppError::Validation(format!("{key} is read-only")));
        }

        self.attributes.push((key.to_owned(), value.to_owned()));
        Ok(())
    }

    fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_owned());
    }
}
