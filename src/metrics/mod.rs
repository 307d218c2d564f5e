use std::{collections::HashMap, fmt};

use prometheus::core::Collector;
use smallvec::SmallVec;

use crate::error::Result;

pub(crate) mod counter;
pub(crate) mod gauge;
pub(crate) mod histogram;

pub use histogram::Timer;

/// The three instrument families the facade knows how to cache. Each kind has
/// its own name -> instrument cache, so they never coordinate with each other.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Kind {
    Counter,
    Gauge,
    Histogram,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Kind::Counter => "counter",
            Kind::Gauge => "gauge",
            Kind::Histogram => "histogram",
        };
        f.write_str(kind)
    }
}

/// Everything the engine needs to build an instrument the first time we see
/// its name. The label schema is frozen from here on.
pub(crate) struct Definition<'a> {
    pub(crate) name: &'a str,
    pub(crate) help: &'a str,
    pub(crate) label_names: SmallVec<[&'a str; 8]>,
    pub(crate) buckets: &'a [f64],
}

impl<'a> Definition<'a> {
    pub(crate) fn new(
        name: &'a str,
        description: Option<&'a str>,
        labels: &[(&'a str, &str)],
        buckets: &'a [f64],
    ) -> Self {
        // prometheus refuses an empty help string, so a missing description
        // falls back to the metric name.
        let help = match description {
            Some(description) if !description.is_empty() => description,
            _ => name,
        };
        Self {
            name,
            help,
            label_names: label_names(labels),
            buckets,
        }
    }
}

/// The creation seam between the facade and the engine. Each supported
/// prometheus vector type knows how to build itself from a [`Definition`];
/// the registry handles caching and registration generically on top of it.
pub(crate) trait Instrument: Collector + Clone + 'static {
    const KIND: Kind;

    fn create(def: &Definition<'_>) -> prometheus::Result<Self>;
}

/// Project the label pairs down to the schema (label names only), in the
/// order the caller supplied them.
pub(crate) fn label_names<'a>(labels: &[(&'a str, &str)]) -> SmallVec<[&'a str; 8]> {
    labels.iter().map(|(name, _)| *name).collect()
}

/// Project the label pairs into the name -> value map the engine binds a
/// series with. Binding by name lets the engine reject values supplied under
/// label names that aren't part of the registered schema. A repeated label
/// name would collapse in the map and slip past the engine's cardinality
/// check, so it is rejected here.
pub(crate) fn label_values<'a>(
    labels: &[(&'a str, &'a str)],
) -> prometheus::Result<HashMap<&'a str, &'a str>> {
    let values: HashMap<_, _> = labels.iter().copied().collect();
    if values.len() != labels.len() {
        return Err(prometheus::Error::InconsistentCardinality {
            expect: labels.len(),
            got: values.len(),
        });
    }
    Ok(values)
}

/// The public recording interface. [`crate::Metrics`] is the implementation we
/// ship, but application code can hold an `Arc<dyn MetricsService>` and swap in
/// something else for its own tests.
///
/// Labels are `(name, value)` pairs. The names are only consulted the first time
/// a metric name is used, after that every call has to supply values for
/// exactly the same label names.
pub trait MetricsService: Send + Sync {
    /// Add `increment` to the counter `name`, creating it on first use.
    fn count(
        &self,
        name: &str,
        description: Option<&str>,
        increment: u64,
        labels: &[(&str, &str)],
    ) -> Result<()>;

    /// Set the gauge `name` to `value`, creating it on first use.
    fn gauge(
        &self,
        name: &str,
        description: Option<&str>,
        value: f64,
        labels: &[(&str, &str)],
    ) -> Result<()>;

    /// Start a [`Timer`] that records into the histogram `name` when it is
    /// observed or dropped, creating the histogram on first use.
    fn histogram(
        &self,
        name: &str,
        description: Option<&str>,
        labels: &[(&str, &str)],
    ) -> Result<Timer>;

    fn incr(&self, name: &str) -> Result<()> {
        self.count(name, None, 1, &[])
    }

    fn incr_labeled(&self, name: &str, labels: &[(&str, &str)]) -> Result<()> {
        self.count(name, None, 1, labels)
    }

    fn set(&self, name: &str, value: f64) -> Result<()> {
        self.gauge(name, None, value, &[])
    }

    fn set_labeled(&self, name: &str, value: f64, labels: &[(&str, &str)]) -> Result<()> {
        self.gauge(name, None, value, labels)
    }

    fn time(&self, name: &str) -> Result<Timer> {
        self.histogram(name, None, &[])
    }

    fn time_labeled(&self, name: &str, labels: &[(&str, &str)]) -> Result<Timer> {
        self.histogram(name, None, labels)
    }
}
