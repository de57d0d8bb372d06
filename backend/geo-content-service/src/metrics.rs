//! Prometheus metrics for geo-content-service.
//!
//! Collectors register with the default registry; `/metrics` renders them.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Like toggles segmented by resource kind and resulting action (like/unlike).
    pub static ref LIKE_TOGGLES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "geo_content_like_toggles_total",
        "Like toggles segmented by resource and action",
        &["resource", "action"]
    )
    .expect("failed to register geo_content_like_toggles_total");

    /// Storage failures (including timeouts) segmented by store operation.
    pub static ref STORAGE_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "geo_content_storage_errors_total",
        "Storage errors segmented by operation",
        &["operation"]
    )
    .expect("failed to register geo_content_storage_errors_total");
}

pub fn record_like_toggle(resource: &str, liked: bool) {
    let action = if liked { "like" } else { "unlike" };
    LIKE_TOGGLES_TOTAL
        .with_label_values(&[resource, action])
        .inc();
}

pub fn record_storage_error(operation: &str) {
    STORAGE_ERRORS_TOTAL.with_label_values(&[operation]).inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
