//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod json;
mod runbook;
mod schema;

pub use json::{
    MAX_ATTACHMENT_RULE_DEPTH, encode_canonical_json, normalize_json_string, validate_json_string,
};
pub use runbook::{
    ATTR_ATTACHMENT_RULE, ATTR_DESCRIPTION, ATTR_ID, ATTR_NAME, ATTR_OWNER_ID,
    RUNBOOK_DATA_SOURCE_NAME, RUNBOOK_DATA_SOURCE_SCHEMA, Runbook, RunbookDataSourceConfig,
    RunbookInput, RunbookOwner, RunbookReadResult,
};
pub use schema::{AttributeMode, AttributeSchema, DataSourceSchema};
