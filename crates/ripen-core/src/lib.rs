//! ripen-core library.
//!
//! Replays a flashcard review log day by day, classifies every card into a
//! maturity category, estimates how much of it is still remembered, and
//! buckets the result into chart-ready series.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per layer, `anyhow::Result` for
//!   configuration loading.
//! - **Logging**: Use `tracing` macros (`debug!`, `warn!`) and `#[instrument]`
//!   on pipeline stages. The library never installs a subscriber.

pub mod aggregate;
pub mod chart;
pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod replay;
pub mod report;
pub mod retention;
pub mod series;
pub mod source;
pub mod window;

pub use report::{Report, ReportError, ReportRequest, build_report, daily_report};
