use prometheus::{IntCounterVec, Opts};

use super::{label_values, Definition, Instrument, Kind};

impl Instrument for IntCounterVec {
    const KIND: Kind = Kind::Counter;

    fn create(def: &Definition<'_>) -> prometheus::Result<Self> {
        IntCounterVec::new(Opts::new(def.name, def.help), &def.label_names)
    }
}

/// Bump the series selected by `labels`. Counters only go up, which is why
/// the increment is unsigned.
pub(crate) fn increment(
    counter: &IntCounterVec,
    labels: &[(&str, &str)],
    by: u64,
) -> prometheus::Result<()> {
    counter.get_metric_with(&label_values(labels)?)?.inc_by(by);
    Ok(())
}
