use hydrant_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json::{encode_canonical_json, normalize_json_string, validate_json_string};
use crate::schema::{AttributeMode, AttributeSchema, DataSourceSchema};

/// Registered type name of the runbook data source.
pub const RUNBOOK_DATA_SOURCE_NAME: &str = "firehydrant_runbook";

/// Runbook identifier attribute.
pub const ATTR_ID: &str = "id";
/// Runbook description attribute.
pub const ATTR_DESCRIPTION: &str = "description";
/// Runbook name attribute.
pub const ATTR_NAME: &str = "name";
/// Owning team identifier attribute.
pub const ATTR_OWNER_ID: &str = "owner_id";
/// Attachment rule JSON text attribute.
pub const ATTR_ATTACHMENT_RULE: &str = "attachment_rule";

/// Schema of the `firehydrant_runbook` data source.
pub static RUNBOOK_DATA_SOURCE_SCHEMA: DataSourceSchema = DataSourceSchema {
    type_name: RUNBOOK_DATA_SOURCE_NAME,
    description: "Reads a FireHydrant runbook by ID.",
    attributes: &[
        AttributeSchema {
            name: ATTR_ID,
            mode: AttributeMode::Required,
            description: "ID of the runbook.",
            validate: None,
            state_func: None,
        },
        AttributeSchema {
            name: ATTR_DESCRIPTION,
            mode: AttributeMode::Computed,
            description: "Description of the runbook.",
            validate: None,
            state_func: None,
        },
        AttributeSchema {
            name: ATTR_NAME,
            mode: AttributeMode::Computed,
            description: "Name of the runbook.",
            validate: None,
            state_func: None,
        },
        AttributeSchema {
            name: ATTR_OWNER_ID,
            mode: AttributeMode::Computed,
            description: "ID of the team that owns the runbook.",
            validate: None,
            state_func: None,
        },
        AttributeSchema {
            name: ATTR_ATTACHMENT_RULE,
            mode: AttributeMode::Optional,
            description: "JSON-encoded rule deciding which incidents the runbook attaches to.",
            validate: Some(validate_json_string),
            state_func: Some(normalize_json_string),
        },
    ],
};

/// Team or user responsible for a runbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunbookOwner {
    /// Owner identifier.
    pub id: String,
    /// Owner display name, when the API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Input payload used to construct a [`Runbook`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunbookInput {
    /// Identifier assigned by FireHydrant.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Optional owner reference.
    pub owner: Option<RunbookOwner>,
    /// Structured attachment rule as returned by the API.
    pub attachment_rule: Value,
}

/// Runbook snapshot as observed from the FireHydrant API.
#[derive(Debug, Clone, PartialEq)]
pub struct Runbook {
    id: NonEmptyString,
    name: String,
    description: String,
    owner: Option<RunbookOwner>,
    attachment_rule: Value,
}

impl Runbook {
    /// Creates a runbook snapshot; the identifier must be non-empty.
    pub fn new(input: RunbookInput) -> AppResult<Self> {
        let id = NonEmptyString::new(input.id).map_err(|_| {
            AppError::Validation("runbook id must not be empty".to_owned())
        })?;

        Ok(Self {
            id,
            name: input.name,
            description: input.description,
            owner: input.owner,
            attachment_rule: input.attachment_rule,
        })
    }

    /// Returns the canonical runbook identifier.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the runbook name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the runbook description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the owner reference, if the runbook is owned.
    #[must_use]
    pub fn owner(&self) -> Option<&RunbookOwner> {
        self.owner.as_ref()
    }

    /// Returns the structured attachment rule.
    #[must_use]
    pub fn attachment_rule(&self) -> &Value {
        &self.attachment_rule
    }
}

/// Projection of a [`Runbook`] into data source state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunbookReadResult {
    /// Canonical identifier returned by the API.
    pub id: String,
    /// Runbook name.
    pub name: String,
    /// Runbook description.
    pub description: String,
    /// Owner identifier; absent when the runbook has no owner.
    pub owner_id: Option<String>,
    /// Canonical JSON text of the attachment rule.
    pub attachment_rule: String,
}

impl RunbookReadResult {
    /// Projects a fetched runbook, encoding its attachment rule.
    pub fn from_runbook(runbook: &Runbook) -> Result<Self, serde_json::Error> {
        let attachment_rule = encode_canonical_json(runbook.attachment_rule())?;

        Ok(Self {
            id: runbook.id().as_str().to_owned(),
            name: runbook.name().to_owned(),
            description: runbook.description().to_owned(),
            owner_id: runbook.owner().map(|owner| owner.id.clone()),
            attachment_rule,
        })
    }

    /// Returns the state attributes in write order.
    ///
    /// `owner_id` is only listed when the runbook has an owner.
    #[must_use]
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attributes = vec![
            (ATTR_DESCRIPTION, self.description.as_str()),
            (ATTR_NAME, self.name.as_str()),
            (ATTR_ATTACHMENT_RULE, self.attachment_rule.as_str()),
        ];

        if let Some(owner_id) = &self.owner_id {
            attributes.push((ATTR_OWNER_ID, owner_id.as_str()));
        }

        attributes
    }
}

/// Typed configuration of the runbook data source.
///
/// A configured `attachment_rule` is validated but not kept: reads always
/// overwrite it with the value returned by FireHydrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunbookDataSourceConfig {
    id: NonEmptyString,
}

impl RunbookDataSourceConfig {
    /// Validates a raw configuration object and extracts typed values.
    pub fn from_config(config: &Value) -> AppResult<Self> {
        RUNBOOK_DATA_SOURCE_SCHEMA.validate_config(config)?;

        let id = config
            .get(ATTR_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Validation("attribute 'id' is required".to_owned()))?;

        Ok(Self {
            id: NonEmptyString::new(id)?,
        })
    }

    /// Returns the configured runbook identifier.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn runbook(owner: Option<RunbookOwner>) -> Runbook {
        Runbook::new(RunbookInput {
            id: "rb-001".to_owned(),
            name: "Deploy Rollback".to_owned(),
            description: "Auto rollback".to_owned(),
            owner,
            attachment_rule: json!({"type": "all"}),
        })
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn runbook_requires_identifier() {
        let result = Runbook::new(RunbookInput {
            id: " ".to_owned(),
            name: "Deploy Rollback".to_owned(),
            description: String::new(),
            owner: None,
            attachment_rule: Value::Null,
        });

        assert!(result.is_err());
    }

    #[test]
    fn projection_without_owner_omits_owner_id() {
        let result = RunbookReadResult::from_runbook(&runbook(None));
        assert!(result.is_ok());
        let result = result.unwrap_or_else(|_| unreachable!());

        assert_eq!(result.id, "rb-001");
        assert_eq!(result.attachment_rule, "{\"type\":\"all\"}");
        assert!(result.owner_id.is_none());

        let mut attributes = result.attributes();
        attributes.sort_unstable();
        assert_eq!(
            attributes,
            vec![
                (ATTR_ATTACHMENT_RULE, "{\"type\":\"all\"}"),
                (ATTR_DESCRIPTION, "Auto rollback"),
                (ATTR_NAME, "Deploy Rollback"),
            ]
        );
    }

    #[test]
    fn projection_with_owner_lists_owner_id() {
        let owner = RunbookOwner {
            id: "team-9".to_owned(),
            name: Some("Platform".to_owned()),
        };
        let result = RunbookReadResult::from_runbook(&runbook(Some(owner)))
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(result.owner_id.as_deref(), Some("team-9"));
        assert!(result.attributes().contains(&(ATTR_OWNER_ID, "team-9")));
    }

    #[test]
    fn config_extracts_id_and_accepts_attachment_rule() {
        let config = RunbookDataSourceConfig::from_config(&json!({
            "id": "rb-002",
            "attachment_rule": "{ \"type\" : \"all\" }",
        }));
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());

        assert_eq!(config.id().as_str(), "rb-002");
    }

    #[test]
    fn config_rejects_invalid_attachment_rule() {
        let config = RunbookDataSourceConfig::from_config(&json!({
            "id": "rb-002",
            "attachment_rule": "{\"type\":",
        }));

        assert!(matches!(config, Err(AppError::Validation(message)) if message.contains("attachment_rule")));
    }

    #[test]
    fn config_rejects_computed_attributes() {
        let config = RunbookDataSourceConfig::from_config(&json!({
            "id": "rb-002",
            "owner_id": "team-9",
        }));

        assert!(config.is_err());
    }

    #[test]
    fn schema_declares_every_state_attribute() {
        for name in [ATTR_ID, ATTR_DESCRIPTION, ATTR_NAME, ATTR_OWNER_ID, ATTR_ATTACHMENT_RULE] {
            assert!(RUNBOOK_DATA_SOURCE_SCHEMA.attribute(name).is_some(), "{name}");
        }
    }
}
