pub mod config;
pub mod error;
pub mod signups;
pub mod telemetry;
