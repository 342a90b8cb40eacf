//! Run orchestration for serpwatch.
//!
//! [`Monitor`] drives one run through collection, aggregation, persistence
//! and notification while keeping a [`StatusStore`] current.
//! [`RunManager`] launches runs on a single background worker.

pub mod aggregate;
pub mod error;
pub mod manager;
pub mod monitor;
pub mod status;

pub use aggregate::{summarize, KeywordCollection, RunResults};
pub use error::MonitorError;
pub use manager::{RunManager, RunTicket};
pub use monitor::{Monitor, MonitorOptions, RunOutcome};
pub use status::{progress_percent, StatusStore};
