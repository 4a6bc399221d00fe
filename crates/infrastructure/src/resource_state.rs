use std::collections::BTreeMap;

use hydrant_application::StateSink;
use hydrant_core::{AppError, AppResult};
use hydrant_domain::DataSourceSchema;
use serde::Serialize;

/// Schema-aware state of one data source read.
///
/// Values pass through the attribute's state function before they are stored.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceState {
    #[serde(skip)]
    schema: &'static DataSourceSchema,
    id: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl ResourceState {
    /// Creates empty state for a data source schema.
    #[must_use]
    pub fn new(schema: &'static DataSourceSchema) -> Self {
        Self {
            schema,
            id: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Returns the resource identifier once the read has finished.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns one stored attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Returns all stored attributes.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Returns whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.attributes.is_empty()
    }
}

impl StateSink for ResourceState {
    fn set_attribute(&mut self, key: &str, value: &str) -> AppResult<()> {
        let attribute = self.schema.attribute(key).ok_or_else(|| {
            AppError::Validation(format!(
                "attribute '{key}' is not declared by {}",
                self.schema.type_name
            ))
        })?;

        self.attributes
            .insert(key.to_owned(), attribute.state_value(value));
        Ok(())
    }

    fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_owned());
    }
}
