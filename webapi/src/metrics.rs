//! Prometheus metrics for the web API.
//!
//! [`WebApiMetrics`] owns a dedicated [`Registry`] which the `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

pub struct WebApiMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Fee address requests received.
    pub fee_requests: IntCounter,
    /// Fee address requests answered successfully.
    pub fee_addresses_served: IntCounter,
    /// Failed fee address requests, labelled by error code.
    pub fee_errors: IntCounterVec,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Ticket records held, refreshed on every `vspinfo` request.
    pub tickets: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time to answer a fee address request, in milliseconds.
    pub fee_request_ms: Histogram,
}

impl WebApiMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let fee_requests = register_int_counter_with_registry!(
            Opts::new("vsp_fee_requests_total", "Fee address requests received"),
            registry
        )
        .expect("failed to register fee_requests counter");

        let fee_addresses_served = register_int_counter_with_registry!(
            Opts::new(
                "vsp_fee_addresses_served_total",
                "Fee address requests answered successfully"
            ),
            registry
        )
        .expect("failed to register fee_addresses_served counter");

        let fee_errors = register_int_counter_vec_with_registry!(
            Opts::new("vsp_fee_errors_total", "Failed fee address requests by error code"),
            &["code"],
            registry
        )
        .expect("failed to register fee_errors counter");

        let tickets = register_int_gauge_with_registry!(
            Opts::new("vsp_tickets", "Ticket records held by the VSP"),
            registry
        )
        .expect("failed to register tickets gauge");

        // 0.5 ms → ~8 s
        let fee_request_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "vsp_fee_request_ms",
                "Time to answer a fee address request in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.5, 2.0, 15).unwrap()),
            registry
        )
        .expect("failed to register fee_request_ms histogram");

        Self {
            registry,
            fee_requests,
            fee_addresses_served,
            fee_errors,
            tickets,
            fee_request_ms,
        }
    }

    /// Encode every metric in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for WebApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_registered_metrics() {
        let metrics = WebApiMetrics::new();
        metrics.fee_requests.inc();
        metrics.fee_errors.with_label_values(&["7"]).inc();
        let text = metrics.encode().unwrap();
        assert!(text.contains("vsp_fee_requests_total 1"));
        assert!(text.contains("vsp_fee_errors_total{code=\"7\"} 1"));
    }
}
