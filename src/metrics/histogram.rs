use std::{
    fmt,
    time::{Duration, Instant},
};

use prometheus::{Histogram, HistogramOpts, HistogramVec};

use super::{label_values, Definition, Instrument, Kind};

impl Instrument for HistogramVec {
    const KIND: Kind = Kind::Histogram;

    fn create(def: &Definition<'_>) -> prometheus::Result<Self> {
        let opts = HistogramOpts::new(def.name, def.help).buckets(def.buckets.to_vec());
        HistogramVec::new(opts, &def.label_names)
    }
}

/// Bind a fresh [`Timer`] to the series selected by `labels`.
pub(crate) fn start_timer(
    histogram: &HistogramVec,
    labels: &[(&str, &str)],
) -> prometheus::Result<Timer> {
    let series = histogram.get_metric_with(&label_values(labels)?)?;
    Ok(Timer::new(series))
}

/// A running stopwatch bound to one histogram series. The clock starts when
/// the timer is created and the elapsed seconds are recorded exactly once:
/// either by [`Timer::observe_duration`] or when the timer goes out of scope,
/// whichever comes first. Early returns, `?` and unwinding all count as going
/// out of scope.
#[must_use = "a timer records when dropped, bind it to a variable to time a scope"]
pub struct Timer {
    histogram: Histogram,
    start: Instant,
    observed: bool,
}

impl Timer {
    pub(crate) fn new(histogram: Histogram) -> Self {
        Self {
            histogram,
            start: Instant::now(),
            observed: false,
        }
    }

    /// Time since the timer was started. Doesn't record anything.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record the elapsed time now. Returns the recorded duration the first
    /// time, and `None` on every later call since nothing more is recorded.
    pub fn observe_duration(&mut self) -> Option<Duration> {
        if self.observed {
            return None;
        }
        self.observed = true;
        let elapsed = self.start.elapsed();
        self.histogram.observe(elapsed.as_secs_f64());
        Some(elapsed)
    }

    /// Throw the timer away without recording.
    pub fn discard(mut self) {
        self.observed = true;
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.observe_duration();
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("elapsed", &self.elapsed())
            .field("observed", &self.observed)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::{
        panic::{self, AssertUnwindSafe},
        time::Duration,
    };

    use prometheus::{Histogram, HistogramOpts};

    use super::Timer;

    fn histogram() -> Histogram {
        Histogram::with_opts(HistogramOpts::new("timer_test_seconds", "timer test")).unwrap()
    }

    #[test]
    fn drop_records_once() {
        let hist = histogram();
        {
            let _timer = Timer::new(hist.clone());
        }
        assert_eq!(hist.get_sample_count(), 1);
    }

    #[test]
    fn observe_then_drop_records_once() {
        let hist = histogram();
        let mut timer = Timer::new(hist.clone());
        std::thread::sleep(Duration::from_millis(5));
        let recorded = timer.observe_duration().unwrap();
        assert!(recorded >= Duration::from_millis(5));
        assert!(timer.observe_duration().is_none());
        drop(timer);
        assert_eq!(hist.get_sample_count(), 1);
        assert!(hist.get_sample_sum() >= 0.005);
    }

    #[test]
    fn discard_records_nothing() {
        let hist = histogram();
        let timer = Timer::new(hist.clone());
        timer.discard();
        assert_eq!(hist.get_sample_count(), 0);
    }

    #[test]
    fn records_on_unwind() {
        let hist = histogram();
        let cloned = hist.clone();
        let res = panic::catch_unwind(AssertUnwindSafe(move || {
            let _timer = Timer::new(cloned);
            panic!("boom");
        }));
        assert!(res.is_err());
        assert_eq!(hist.get_sample_count(), 1);
    }

    async fn timed_step(hist: Histogram, fail: bool) -> anyhow::Result<()> {
        let _timer = Timer::new(hist);
        tokio::time::sleep(Duration::from_millis(10)).await;
        if fail {
            anyhow::bail!("step failed");
        }
        Ok(())
    }

    #[tokio::test]
    async fn records_across_await_and_early_return() {
        let hist = histogram();
        assert!(timed_step(hist.clone(), true).await.is_err());
        timed_step(hist.clone(), false).await.unwrap();
        assert_eq!(hist.get_sample_count(), 2);
        assert!(hist.get_sample_sum() >= 0.02);
    }
}
