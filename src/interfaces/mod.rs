//! Abstract interfaces for the metrics engine.
//!
//! These traits define the contracts for:
//! - Record retrieval (the read side of persistence)

pub mod metrics_source;

pub use metrics_source::{MetricsSource, SourceError};
