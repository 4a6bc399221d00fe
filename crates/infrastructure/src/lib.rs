//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_runbook_client;
mod in_memory_runbook_client;
mod resource_state;

pub use http_runbook_client::HttpRunbookClient;
pub use in_memory_runbook_client::InMemoryRunbookClient;
pub use resource_state::ResourceState;
