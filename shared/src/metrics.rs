//! Installs the process-wide statsd recorder behind the `metrics` facade.

use metrics_exporter_statsd::StatsdBuilder;

#[derive(thiserror::Error, Debug)]
pub enum MetricsError {
    #[error("could not build statsd recorder: {0}")]
    Build(#[from] metrics_exporter_statsd::StatsdError),
    #[error("a global metrics recorder is already installed")]
    AlreadyInstalled,
}

/// Sends every metric emitted through the `metrics` facade to StatsD.
///
/// Without a call to this function all metrics are discarded.
pub fn init_statsd(statsd_host: &str, statsd_port: u16, prefix: &str) -> Result<(), MetricsError> {
    let recorder = StatsdBuilder::from(statsd_host, statsd_port).build(Some(prefix))?;
    metrics::set_global_recorder(recorder).map_err(|_| MetricsError::AlreadyInstalled)?;
    Ok(())
}
