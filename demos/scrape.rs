use std::time::Duration;

use metrics_facade::{MetricsService, DEFAULT_METRICS};

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    for queue in ["default", "priority", "default"] {
        let _timer =
            DEFAULT_METRICS.histogram("demo_job_seconds", Some("job runtime"), &[("queue", queue)])?;
        DEFAULT_METRICS.count("demo_jobs_total", Some("jobs run"), 1, &[("queue", queue)])?;
        std::thread::sleep(Duration::from_millis(20));
    }
    DEFAULT_METRICS.set("demo_queue_depth", 3.0)?;

    print!("{}", DEFAULT_METRICS.render()?);
    Ok(())
}
