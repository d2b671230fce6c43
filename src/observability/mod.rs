//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay + http layers produce:
//!     → logging.rs (structured tracing events, request_id span field)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
