use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use prometheus::{Encoder, GaugeVec, HistogramVec, IntCounterVec, Registry, TextEncoder};

use crate::{
    error::Result,
    metrics::{counter, gauge, histogram, Definition, Instrument, MetricsService, Timer},
};

/// A process wide facade bound to prometheus' default registry, for callers
/// that just want `prometheus::gather()` to see everything.
pub static DEFAULT_METRICS: LazyLock<Metrics> =
    LazyLock::new(|| Metrics::with_registry(prometheus::default_registry().clone()));

/// Lazily creates, caches and records into named counters, gauges and
/// histograms. Instruments are built and registered the first time a name is
/// used and live as long as the `Metrics` value does.
///
/// Each kind has its own cache, but all of them register into the same
/// prometheus [`Registry`], which rejects reusing a name across kinds. A name
/// used for a counter can't later be used for a gauge or histogram on the same
/// `Metrics` (the text exposition can only carry one family per name), and the
/// second call returns the registry's `AlreadyReg` error.
pub struct Metrics {
    registry: Registry,
    buckets: Vec<f64>,
    counters: DashMap<String, Arc<IntCounterVec>>,
    gauges: DashMap<String, Arc<GaugeVec>>,
    histograms: DashMap<String, Arc<HistogramVec>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// A facade with its own private registry. Two of these never see each
    /// other's metrics.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self::builder().registry(registry).build()
    }

    pub fn builder() -> MetricsBuilder {
        MetricsBuilder::default()
    }

    /// The registry every instrument is registered into. Hand this to whatever
    /// serves your scrape endpoint.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render everything in the registry in the prometheus text exposition
    /// format.
    pub fn render(&self) -> Result<String> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn counter_vec(&self, name: &str) -> Option<Arc<IntCounterVec>> {
        self.counters.get(name).map(|c| Arc::clone(c.value()))
    }

    pub fn gauge_vec(&self, name: &str) -> Option<Arc<GaugeVec>> {
        self.gauges.get(name).map(|g| Arc::clone(g.value()))
    }

    pub fn histogram_vec(&self, name: &str) -> Option<Arc<HistogramVec>> {
        self.histograms.get(name).map(|h| Arc::clone(h.value()))
    }

    /// Number of cached instruments across all kinds.
    pub fn len(&self) -> usize {
        self.counters.len() + self.gauges.len() + self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the cached instrument for `name`, or build and register one.
    ///
    /// Creation and registration run under the cache shard's write lock via
    /// the entry API, so racing first uses of the same name produce exactly
    /// one instrument and everyone records into it. Registering a second
    /// instrument under the same name would be rejected by the registry
    /// anyway. A failed creation leaves nothing behind in the cache.
    fn get_or_create<V: Instrument>(
        &self,
        cache: &DashMap<String, Arc<V>>,
        name: &str,
        description: Option<&str>,
        labels: &[(&str, &str)],
    ) -> Result<Arc<V>> {
        if let Some(existing) = cache.get(name) {
            return Ok(Arc::clone(existing.value()));
        }

        let kind = V::KIND;
        let entry = cache
            .entry(name.to_owned())
            .or_try_insert_with(|| {
                let def = Definition::new(name, description, labels, &self.buckets);
                let instrument = V::create(&def)?;
                self.registry.register(Box::new(instrument.clone()))?;
                tracing::debug!(message="registered metric", kind=%kind, name=name, labels=?def.label_names);
                Ok::<_, prometheus::Error>(Arc::new(instrument))
            })
            .inspect_err(|e| {
                tracing::debug!(message="failed to create metric", kind=%kind, name=name, error=%e);
            })?;
        Ok(Arc::clone(entry.value()))
    }
}

impl MetricsService for Metrics {
    fn count(
        &self,
        name: &str,
        description: Option<&str>,
        increment: u64,
        labels: &[(&str, &str)],
    ) -> Result<()> {
        let instrument = self.get_or_create(&self.counters, name, description, labels)?;
        counter::increment(&instrument, labels, increment).inspect_err(|e| {
            tracing::debug!(message="failed to bind counter series", name=name, error=%e);
        })?;
        Ok(())
    }

    fn gauge(
        &self,
        name: &str,
        description: Option<&str>,
        value: f64,
        labels: &[(&str, &str)],
    ) -> Result<()> {
        let instrument = self.get_or_create(&self.gauges, name, description, labels)?;
        gauge::set(&instrument, labels, value).inspect_err(|e| {
            tracing::debug!(message="failed to bind gauge series", name=name, error=%e);
        })?;
        Ok(())
    }

    fn histogram(
        &self,
        name: &str,
        description: Option<&str>,
        labels: &[(&str, &str)],
    ) -> Result<Timer> {
        let instrument = self.get_or_create(&self.histograms, name, description, labels)?;
        let timer = histogram::start_timer(&instrument, labels).inspect_err(|e| {
            tracing::debug!(message="failed to bind histogram series", name=name, error=%e);
        })?;
        Ok(timer)
    }
}

/// Construction options for [`Metrics`]. Bucket boundaries are handed
/// straight to prometheus, we never compute any ourselves.
pub struct MetricsBuilder {
    registry: Option<Registry>,
    buckets: Vec<f64>,
}

impl Default for MetricsBuilder {
    fn default() -> Self {
        Self {
            registry: None,
            buckets: prometheus::DEFAULT_BUCKETS.to_vec(),
        }
    }
}

impl MetricsBuilder {
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Bucket upper bounds for every histogram this facade creates.
    pub fn buckets(mut self, buckets: Vec<f64>) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn build(self) -> Metrics {
        Metrics {
            registry: self.registry.unwrap_or_default(),
            buckets: self.buckets,
            counters: DashMap::new(),
            gauges: DashMap::new(),
            histograms: DashMap::new(),
        }
    }
}
