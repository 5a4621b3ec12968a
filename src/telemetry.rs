// src/telemetry.rs
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. A run is a short-lived process, so
    /// there is no scrape endpoint; call `log_snapshot` before exit instead.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        Ok(Self { handle })
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn log_snapshot(&self) {
        tracing::info!(target: "metrics", "run metrics:\n{}", self.render());
    }
}
