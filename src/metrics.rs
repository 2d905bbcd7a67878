//! Prometheus metrics
//!
//! Per-route request counters and latencies, plus the memo cache counters of
//! each kernel, exported in the Prometheus text format.

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

use crate::audit::Operation;
use crate::kernel::CacheStats;

/// Metrics registry for one server instance.
pub struct Metrics {
    registry: Registry,

    /// Requests by method, matched route and status class
    requests_total: IntCounterVec,

    /// Request latency by method and matched route
    request_duration_seconds: HistogramVec,

    cache_hits: IntGaugeVec,
    cache_misses: IntGaugeVec,
    cache_evictions: IntGaugeVec,
    cache_entries: IntGaugeVec,
}

impl Metrics {
    /// Create and register all metrics on a fresh registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "handler", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["method", "handler"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let cache_hits = cache_gauge(&registry, "mathops_cache_hits", "Memo cache hits")?;
        let cache_misses = cache_gauge(&registry, "mathops_cache_misses", "Memo cache misses")?;
        let cache_evictions =
            cache_gauge(&registry, "mathops_cache_evictions", "Memo cache evictions")?;
        let cache_entries =
            cache_gauge(&registry, "mathops_cache_entries", "Live memo cache entries")?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            cache_hits,
            cache_misses,
            cache_evictions,
            cache_entries,
        })
    }

    /// Count one finished request. Status codes are grouped by class ("2xx").
    pub fn observe_request(&self, method: &str, handler: &str, status: u16, elapsed: Duration) {
        let class = format!("{}xx", status / 100);
        self.requests_total
            .with_label_values(&[method, handler, class.as_str()])
            .inc();
        self.request_duration_seconds
            .with_label_values(&[method, handler])
            .observe(elapsed.as_secs_f64());
    }

    /// Copy a kernel's cache counters into the gauges.
    pub fn record_cache(&self, operation: Operation, stats: &CacheStats) {
        let label = [operation.as_str()];
        self.cache_hits.with_label_values(&label).set(stats.hits as i64);
        self.cache_misses.with_label_values(&label).set(stats.misses as i64);
        self.cache_evictions
            .with_label_values(&label)
            .set(stats.evictions as i64);
        self.cache_entries
            .with_label_values(&label)
            .set(stats.entries as i64);
    }

    /// Export metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn cache_gauge(
    registry: &Registry,
    name: &str,
    help: &str,
) -> Result<IntGaugeVec, prometheus::Error> {
    let gauge = IntGaugeVec::new(Opts::new(name, help), &["operation"])?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}
