use async_trait::async_trait;
use hydrant_core::{Diagnostic, Diagnostics, RequestContext};
use hydrant_domain::{DataSourceSchema, RUNBOOK_DATA_SOURCE_SCHEMA, RunbookDataSourceConfig};
use serde_json::Value;
use tracing::warn;

use crate::data_source_registry::DataSource;
use crate::runbook_ports::StateSink;
use crate::runbook_reader::RunbookReader;

/// `firehydrant_runbook` data source.
#[derive(Clone)]
pub struct RunbookDataSource {
    reader: RunbookReader,
}

impl RunbookDataSource {
    /// Creates the data source from a runbook reader.
    #[must_use]
    pub fn new(reader: RunbookReader) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl DataSource for RunbookDataSource {
    fn schema(&self) -> &'static DataSourceSchema {
        &RUNBOOK_DATA_SOURCE_SCHEMA
    }

    async fn read(
        &self,
        context: &RequestContext,
        config: &Value,
        state: &mut dyn StateSink,
    ) -> Diagnostics {
        let config = match RunbookDataSourceConfig::from_config(config) {
            Ok(config) => config,
            Err(error) => return Diagnostic::from(&error).into(),
        };

        match self.reader.read(context, config.id(), state).await {
            Ok(_) => Diagnostics::new(),
            Err(error) => {
                warn!(
                    runbook_id = %error.runbook_id(),
                    error = %error,
                    "runbook read failed"
                );
                Diagnostic::from(&error).into()
            }
        }
    }
}
