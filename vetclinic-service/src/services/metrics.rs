//! Metrics module for vetclinic-service.
//! Prometheus metrics for storage operations and the HTTP surface.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "vetclinic_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// HTTP request counter
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// HTTP request duration histogram
pub static HTTP_REQUEST_DURATION: OnceLock<HistogramVec> = OnceLock::new();

/// Registration counter by role
pub static REGISTRATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Access denials by resource
pub static ACCESS_DENIED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    HTTP_REQUESTS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "vetclinic_http_requests_total",
                "Total HTTP requests by method, path and status"
            ),
            &["method", "path", "status"]
        )
        .expect("Failed to register HTTP_REQUESTS_TOTAL")
    });

    HTTP_REQUEST_DURATION.get_or_init(|| {
        register_histogram_vec!(
            histogram_opts!(
                "vetclinic_http_request_duration_seconds",
                "HTTP request duration by method and path"
            ),
            &["method", "path"]
        )
        .expect("Failed to register HTTP_REQUEST_DURATION")
    });

    REGISTRATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "vetclinic_registrations_total",
                "Completed registrations by role"
            ),
            &["role"]
        )
        .expect("Failed to register REGISTRATIONS_TOTAL")
    });

    ACCESS_DENIED_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "vetclinic_access_denied_total",
                "Policy denials by resource and role"
            ),
            &["resource", "role"]
        )
        .expect("Failed to register ACCESS_DENIED_TOTAL")
    });
}

/// Render the registry in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
