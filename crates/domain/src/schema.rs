//! Static data source schema declarations.

use hydrant_core::{AppError, AppResult};
use serde::Serialize;
use serde_json::Value;

/// How an attribute participates in configuration and state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Must be set in configuration.
    Required,
    /// May be set in configuration; the provider may also compute it.
    Optional,
    /// Populated by the provider only.
    Computed,
}

/// One string attribute of a data source.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AttributeSchema {
    /// Attribute name as it appears in configuration and state.
    pub name: &'static str,
    /// Configuration mode.
    pub mode: AttributeMode,
    /// Human-readable attribute description.
    pub description: &'static str,
    /// Validation applied to configured values.
    #[serde(skip)]
    pub validate: Option<fn(&str) -> AppResult<()>>,
    /// Canonicalization applied before a value is stored in state.
    #[serde(skip)]
    pub state_func: Option<fn(&str) -> String>,
}

impl AttributeSchema {
    /// Returns whether configuration may set this attribute.
    #[must_use]
    pub fn is_configurable(&self) -> bool {
        self.mode != AttributeMode::Computed
    }

    /// Returns the value as it should be stored in state.
    #[must_use]
    pub fn state_value(&self, value: &str) -> String {
        match self.state_func {
            Some(state_func) => state_func(value),
            None => value.to_owned(),
        }
    }
}

/// Schema of one read-only data source.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DataSourceSchema {
    /// Data source type name, e.g. `firehydrant_runbook`.
    pub type_name: &'static str,
    /// Human-readable data source description.
    pub description: &'static str,
    /// Declared attributes.
    pub attributes: &'static [AttributeSchema],
}

impl DataSourceSchema {
    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeSchema> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
    }

    /// Validates a raw configuration object against the declared attributes.
    pub fn validate_config(&self, config: &Value) -> AppResult<()> {
        let entries = config.as_object().ok_or_else(|| {
            AppError::Validation(format!(
                "{} configuration must be an object",
                self.type_name
            ))
        })?;

        for (name, value) in entries {
            let attribute = self.attribute(name).ok_or_else(|| {
                AppError::Validation(format!(
                    "unsupported attribute '{name}' for {}",
                    self.type_name
                ))
            })?;

            if value.is_null() {
                continue;
            }

            if !attribute.is_configurable() {
                return Err(AppError::Validation(format!(
                    "attribute '{name}' is computed and cannot be configured"
                )));
            }

            let text = value.as_str().ok_or_else(|| {
                AppError::Validation(format!("attribute '{name}' must be a string"))
            })?;

            if let Some(validate) = attribute.validate {
                validate(text).map_err(|error| {
                    AppError::Validation(format!("attribute '{name}': {error}"))
                })?;
            }
        }

        for attribute in self
            .attributes
            .iter()
            .filter(|attribute| attribute.mode == AttributeMode::Required)
        {
            let present = entries
                .get(attribute.name)
                .and_then(Value::as_str)
                .is_some_and(|text| !text.trim().is_empty());

            if !present {
                return Err(AppError::Validation(format!(
                    "attribute '{}' is required",
                    attribute.name
                )));
            }
        }

        Ok(())
    }
}
