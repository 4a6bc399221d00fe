use std::sync::Arc;

use hydrant_core::{AppError, Diagnostic, NonEmptyString, RequestContext};
use hydrant_domain::RunbookReadResult;
use thiserror::Error;
use tracing::debug;

use crate::runbook_ports::{RunbookClient, StateSink};


/// Failure of one runbook read. Every variant is terminal for the read.
#[derive(Debug, Error)]
pub enum RunbookReadError {
    /// The remote lookup failed.
    #[error("Error reading runbook {runbook_id}: {source}")]
    Fetch {
        /// Identifier that was requested.
        runbook_id: String,
        /// Underlying client error.
        #[source]
        source: AppError,
    },

    /// The attachment rule could not be encoded as JSON text.
    #[error(
        "Error converting attachment rule of runbook {runbook_id} to JSON due to invalid JSON returned by FireHydrant: {source}"
    )]
    Encode {
        /// Identifier that was requested.
        runbook_id: String,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The state sink rejected an attribute.
    #[error("Error setting {key} for runbook {runbook_id}: {source}")]
    StateWrite {
        /// Attribute that failed to be written.
        key: String,
        /// Identifier that was requested.
        runbook_id: String,
        /// Underlying sink error.
        #[source]
        source: AppError,
    },
}

impl RunbookReadError {
    /// Returns the requested runbook identifier.
    #[must_use]
    pub fn runbook_id(&self) -> &str {
        match self {
            Self::Fetch { runbook_id, .. }
            | Self::Encode { runbook_id, .. }
            | Self::StateWrite { runbook_id, .. } => runbook_id.as_str(),
        }
    }
}

impl From<&RunbookReadError> for Diagnostic {
    fn from(error: &RunbookReadError) -> Self {
        let diagnostic = Diagnostic::error(error.to_string());
        match error {
            RunbookReadError::StateWrite { key, .. } => diagnostic.with_attribute(key.as_str()),
            RunbookReadError::Encode { .. } => {
                diagnostic.with_attribute(hydrant_domain::ATTR_ATTACHMENT_RULE)
            }
            RunbookReadError::Fetch { .. } => diagnostic,
        }
    }
}

/// Reads runbooks from FireHydrant and projects them into data source state.
#[derive(Clone)]
pub struct RunbookReader {
    client: Arc<dyn RunbookClient>,
}

impl RunbookReader {
    /// Creates a reader backed by a runbook client.
    #[must_use]
    pub fn new(client: Arc<dyn RunbookClient>) -> Self {
        Self { client }
    }

    /// Fetches `runbook_id` once and writes its projection into `state`.
    ///
    /// Attributes are written one at a time; a failed write leaves earlier
    /// attributes in place and the identifier unset.
    pub async fn read(
        &self,
        context: &RequestContext,
        runbook_id: &NonEmptyString,
        state: &mut dyn StateSink,
    ) -> Result<RunbookReadResult, RunbookReadError> {
        let runbook_id = runbook_id.as_str();
        debug!(runbook_id, "reading runbook");

        let runbook = self
            .client
            .fetch_runbook(context, runbook_id)
            .await
            .map_err(|source| RunbookReadError::Fetch {
                runbook_id: runbook_id.to_owned(),
                source,
            })?;

        let result = RunbookReadResult::from_runbook(&runbook).map_err(|source| {
            RunbookReadError::Encode {
                runbook_id: runbook_id.to_owned(),
                source,
            }
        })?;

        for (key, value) in result.attributes() {
            state
                .set_attribute(key, value)
                .map_err(|source| RunbookReadError::StateWrite {
                    key: key.to_owned(),
                    runbook_id: runbook_id.to_owned(),
                    source,
                })?;
        }

        state.set_id(result.id.as_str());
        debug!(
            runbook_id,
            canonical_id = %result.id,
            has_owner = result.owner_id.is_some(),
            "runbook read complete"
        );

        Ok(result)
    }
}
