//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_withdrawals_total` (counter): withdrawals by mode and outcome
//! - `relay_withdraw_duration_seconds` (histogram): end-to-end latency by mode
//! - `relay_token_accounts_created_total` (counter): token accounts paid for
//!   by the operator

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the end of one withdraw request. `outcome` is `"success"` or an
/// error kind.
pub fn record_withdrawal(mode: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!("relay_withdrawals_total", "mode" => mode, "outcome" => outcome)
        .increment(1);
    ::metrics::histogram!("relay_withdraw_duration_seconds", "mode" => mode)
        .record(start.elapsed().as_secs_f64());
}

/// Record token accounts created on behalf of recipients (and the operator).
pub fn record_token_accounts_created(count: u64) {
    ::metrics::counter!("relay_token_accounts_created_total").increment(count);
}
