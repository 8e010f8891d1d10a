// Metrics module for observability

use metrics::{describe_counter, describe_histogram};

use mdahub_audit::service::AUDIT_WRITE_FAILURES;

/// Bumped once per HTTP request entering the app
pub const HTTP_REQUESTS_TOTAL: &str = "mdahub_http_requests_total";
/// Wall-clock time spent handling a request
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "mdahub_http_request_duration_seconds";
/// Bumped on every rejected login attempt, labelled by namespace
pub const LOGIN_FAILURES_TOTAL: &str = "mdahub_login_failures_total";

/// Initialize all metric descriptions.
/// Should be called once at application startup.
pub fn init_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests received");
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request duration in seconds"
    );
    describe_counter!(LOGIN_FAILURES_TOTAL, "Total number of failed login attempts");
    describe_counter!(
        AUDIT_WRITE_FAILURES,
        "Activity records that could not be written to the trail"
    );

    tracing::info!("Metrics initialized");
}
