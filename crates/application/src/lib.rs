//! Application services and ports.

#![forbid(unsafe_code)]

mod data_source_registry;
mod runbook_data_source;
mod runbook_ports;
mod runbook_reader;

#[cfg(test)]
mod test_fakes;

pub use data_source_registry::{DataSource, DataSourceRegistry};
pub use runbook_data_source::RunbookDataSource;
pub use runbook_ports::{RunbookClient, StateSink};
pub use runbook_reader::{RunbookReadError, RunbookReader};
