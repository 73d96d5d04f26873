//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! cache, remote session, resource lifecycle produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters through the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; JSON output is opt-in
//! - Metrics are cheap facade calls; no exporter is installed by default

pub mod logging;
pub mod metrics;
