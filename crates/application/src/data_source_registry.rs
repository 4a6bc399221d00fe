use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use hydrant_core::{AppError, AppResult, Diagnostic, Diagnostics, RequestContext};
use hydrant_domain::DataSourceSchema;
use serde_json::Value;

use crate::runbook_ports::StateSink;

/// Host-facing handler of one read-only data source.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Returns the static schema of the data source.
    fn schema(&self) -> &'static DataSourceSchema;

    /// Reads the data source into `state`; empty diagnostics mean success.
    async fn read(
        &self,
        context: &RequestContext,
        config: &Value,
        state: &mut dyn StateSink,
    ) -> Diagnostics;
}

/// Data sources offered by the provider, keyed by type name.
///
/// Built once at startup and handed to the host layer.
#[derive(Clone, Default)]
pub struct DataSourceRegistry {
    data_sources: BTreeMap<&'static str, Arc<dyn DataSource>>,
}

impl DataSourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a data source under its schema type name.
    pub fn register(&mut self, data_source: Arc<dyn DataSource>) -> AppResult<()> {
        let type_name = data_source.schema().type_name;
        if self.data_sources.contains_key(type_name) {
            return Err(AppError::Validation(format!(
                "data source '{type_name}' is already registered"
            )));
        }

        self.data_sources.insert(type_name, data_source);
        Ok(())
    }

    /// Returns the data source registered as `type_name`.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<Arc<dyn DataSource>> {
        self.data_sources.get(type_name).cloned()
    }

    /// Returns the schemas of all registered data sources, sorted by name.
    #[must_use]
    pub fn schemas(&self) -> Vec<&'static DataSourceSchema> {
        self.data_sources
            .values()
            .map(|data_source| data_source.schema())
            .collect()
    }

    /// Dispatches a read to the data source registered as `type_name`.
    pub async fn read(
        &self,
        type_name: &str,
        context: &RequestContext,
        config: &Value,
        state: &mut dyn StateSink,
    ) -> Diagnostics {
        match self.data_sources.get(type_name) {
            Some(data_source) => data_source.read(context, config, state).await,
            None => Diagnostic::error(format!("unknown data source '{type_name}'")).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use hydrant_core::{Diagnostics, RequestContext};
    use hydrant_domain::{AttributeMode, AttributeSchema, DataSourceSchema};
    use serde_json::{Value, json};

    use crate::runbook_ports::StateSink;
    use crate::test_fakes::RecordingState;

    use super::{DataSource, DataSourceRegistry};

    static ECHO_SCHEMA: DataSourceSchema = DataSourceSchema {
        type_name: "echo",
        description: "Copies its input into state.",
        attributes: &[AttributeSchema {
            name: "id",
            mode: AttributeMode::Required,
            description: "Echoed identifier.",
            validate: None,
            state_func: None,
        }],
    };

    struct EchoDataSource;

    #[async_trait]
    impl DataSource for EchoDataSource {
        fn schema(&self) -> &'static DataSourceSchema {
            &ECHO_SCHEMA
        }

        async fn read(
            &self,
            _context: &RequestContext,
            config: &Value,
            state: &mut dyn StateSink,
        ) -> Diagnostics {
            state.set_id(config.get("id").and_then(Value::as_str).unwrap_or_default());
            Diagnostics::new()
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = DataSourceRegistry::new();
        assert!(registry.register(Arc::new(EchoDataSource)).is_ok());
        assert!(registry.register(Arc::new(EchoDataSource)).is_err());
        assert_eq!(registry.schemas().len(), 1);
        assert!(registry.get("echo").is_some());
    }

    #[tokio::test]
    async fn read_dispatches_by_type_name() {
        let mut registry = DataSourceRegistry::new();
        assert!(registry.register(Arc::new(EchoDataSource)).is_ok());
        let mut state = RecordingState::default();

        let diagnostics = registry
            .read(
                "echo",
                &RequestContext::background(),
                &json!({"id": "e-1"}),
                &mut state,
            )
            .await;

        assert!(diagnostics.is_empty());
        assert_eq!(state.id.as_deref(), Some("e-1"));
    }

    #[tokio::test]
    async fn unknown_data_source_reports_one_error() {
        let registry = DataSourceRegistry::new();
        let mut state = RecordingState::default();

        let diagnostics = registry
            .read(
                "firehydrant_service",
                &RequestContext::background(),
                &json!({}),
                &mut state,
            )
            .await;

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.has_errors());
        assert!(state.id.is_none());
    }
}
