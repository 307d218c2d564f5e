use prometheus::{GaugeVec, Opts};

use super::{label_values, Definition, Instrument, Kind};

impl Instrument for GaugeVec {
    const KIND: Kind = Kind::Gauge;

    fn create(def: &Definition<'_>) -> prometheus::Result<Self> {
        GaugeVec::new(Opts::new(def.name, def.help), &def.label_names)
    }
}

/// Overwrite the series selected by `labels` with `value`.
pub(crate) fn set(gauge: &GaugeVec, labels: &[(&str, &str)], value: f64) -> prometheus::Result<()> {
    gauge.get_metric_with(&label_values(labels)?)?.set(value);
    Ok(())
}
