//! A small facade over the `prometheus` crate that hands out counters, gauges
//! and histogram timers by name, creating and registering them the first time
//! a name shows up.
//!
//! ```
//! use metrics_facade::{Metrics, MetricsService};
//!
//! let metrics = Metrics::new();
//! metrics.count("jobs_total", Some("jobs run"), 1, &[("queue", "default")])?;
//! metrics.gauge("queue_depth", None, 12.0, &[])?;
//! {
//!     let _timer = metrics.histogram("job_seconds", None, &[("queue", "default")])?;
//!     // timed work
//! }
//! assert!(metrics.render()?.contains(r#"jobs_total{queue="default"} 1"#));
//! # Ok::<(), metrics_facade::Error>(())
//! ```
//!
//! The label names passed the first time a metric is used become its schema.
//! Every later call must pass values for exactly those names, anything else is
//! rejected by prometheus and comes back as an [`Error`].

mod error;
mod metrics;
mod registry;

pub use error::{Error, Result};
pub use metrics::{Kind, MetricsService, Timer};
pub use registry::{Metrics, MetricsBuilder, DEFAULT_METRICS};
