//! Metrics module for bill-service.
//! Provides Prometheus metrics for bill operations and tip generation.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Tip generation duration histogram
pub static TIP_GENERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "billwise_tip_generation_duration_seconds",
            "Savings tips generation duration"
        ),
        &["provider"]
    )
    .expect("Failed to register TIP_GENERATION_DURATION")
});

/// Bill operations counter
pub static BILL_OPERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Tip generations counter
pub static TIP_GENERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    BILL_OPERATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "billwise_bill_operations_total",
                "Total bill operations by operation type"
            ),
            &["operation"]
        )
        .expect("Failed to register BILL_OPERATIONS_TOTAL")
    });

    TIP_GENERATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "billwise_tip_generations_total",
                "Total savings tips generations by outcome"
            ),
            &["outcome"]
        )
        .expect("Failed to register TIP_GENERATIONS_TOTAL")
    });

    // Force initialization of lazy statics
    let _ = &*TIP_GENERATION_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}

/// Record a bill operation.
pub fn record_bill_operation(operation: &str) {
    if let Some(counter) = BILL_OPERATIONS_TOTAL.get() {
        counter.with_label_values(&[operation]).inc();
    }
}

/// Record a tip generation outcome.
pub fn record_tip_generation(outcome: &str) {
    if let Some(counter) = TIP_GENERATIONS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record tip generation duration.
pub fn record_tip_generation_duration(provider: &str, duration_secs: f64) {
    TIP_GENERATION_DURATION
        .with_label_values(&[provider])
        .observe(duration_secs);
}
