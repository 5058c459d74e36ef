//! Catalog metrics
//!
//! Counters and histograms for upstream API traffic and the query cache. Nothing
//! is exported unless the embedding process installs a `metrics` recorder.

pub const UPSTREAM_RESPONSES: &str = "dex_upstream_responses_total";
pub const UPSTREAM_REQUESTS_ERROR: &str = "dex_upstream_requests_error_total";
pub const UPSTREAM_REQUEST_DURATION: &str = "dex_upstream_request_duration_seconds";
pub const UPSTREAM_PAYLOAD_BYTES: &str = "dex_upstream_payload_bytes";
pub const CACHE_HITS: &str = "dex_cache_hits_total";
pub const CACHE_MISSES: &str = "dex_cache_misses_total";
pub const FANOUT_SIZE: &str = "dex_fanout_size";

/// Metrics for requests made against the upstream API
pub struct UpstreamMetrics;

impl UpstreamMetrics {
    /// Any response that arrived, labelled by status class
    pub fn record_response(status: u16, duration_secs: f64, payload_bytes: usize) {
        let class = status_class(status);
        ::metrics::counter!(UPSTREAM_RESPONSES, "status" => class).increment(1);
        ::metrics::histogram!(UPSTREAM_REQUEST_DURATION).record(duration_secs);
        ::metrics::histogram!(UPSTREAM_PAYLOAD_BYTES).record(payload_bytes as f64);
    }

    pub fn record_request_error(error_type: &'static str) {
        ::metrics::counter!(UPSTREAM_REQUESTS_ERROR, "error" => error_type).increment(1);
    }

    /// Number of detail requests issued for one list
    pub fn record_fanout(size: usize) {
        ::metrics::histogram!(FANOUT_SIZE).record(size as f64);
    }
}

/// Metrics for the query cache
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn record_hit(kind: &'static str) {
        ::metrics::counter!(CACHE_HITS, "kind" => kind).increment(1);
    }

    pub fn record_miss(kind: &'static str) {
        ::metrics::counter!(CACHE_MISSES, "kind" => kind).increment(1);
    }
}

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(status_class(200), "2xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(503), "5xx");
    }
}
