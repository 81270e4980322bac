//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relic_scans_detected_total` (counter): qualifying images seen by the watcher
//! - `relic_outcomes_total` (counter): finished relics by final `status`
//! - `relic_stage_failures_total` (counter): failures by `stage`
//! - `relic_stage_duration_seconds` (histogram): stage latency by `stage`
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::relic::RelicStatus;

pub const SCANS_DETECTED: &str = "relic_scans_detected_total";
pub const OUTCOMES: &str = "relic_outcomes_total";
pub const STAGE_FAILURES: &str = "relic_stage_failures_total";
pub const STAGE_DURATION: &str = "relic_stage_duration_seconds";

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    register_metrics();
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

fn register_metrics() {
    describe_counter!(SCANS_DETECTED, "Qualifying image files detected in watched folders");
    describe_counter!(OUTCOMES, "Relics finished, by final status");
    describe_counter!(STAGE_FAILURES, "Pipeline stage failures, by stage");
    describe_histogram!(STAGE_DURATION, "Pipeline stage latency in seconds, by stage");
}

pub fn record_scan_detected() {
    counter!(SCANS_DETECTED).increment(1);
}

pub fn record_relic_outcome(status: RelicStatus) {
    counter!(OUTCOMES, "status" => status.as_str()).increment(1);
}

pub fn record_stage_failure(stage: &'static str) {
    counter!(STAGE_FAILURES, "stage" => stage).increment(1);
}

pub fn record_stage_duration(stage: &'static str, elapsed: Duration) {
    histogram!(STAGE_DURATION, "stage" => stage).record(elapsed.as_secs_f64());
}
