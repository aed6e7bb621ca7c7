pub mod config;
pub mod report;

pub use config::{AdventureConfig, ReportConfig, RngConfig, TelemetryConfig};
pub use report::{default_run_id, SessionReport, SessionSummary};
