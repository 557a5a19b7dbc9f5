//! Prometheus metrics
//!
//! Each [`Metrics`] owns its own registry, so independent servers (and
//! tests) never share counters.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to register metric: {0}")]
    Register(prometheus::Error),

    #[error("failed to encode metrics: {0}")]
    Encode(prometheus::Error),

    #[error("metrics output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    requests: IntCounter,
    responses: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let requests = IntCounter::new("counter", "Custom counter for Cars API")
            .map_err(MetricsError::Register)?;
        let responses = IntCounterVec::new(
            Opts::new(
                "carlot_http_responses_total",
                "HTTP responses by matched route and status code",
            ),
            &["route", "status"],
        )
        .map_err(MetricsError::Register)?;

        registry
            .register(Box::new(requests.clone()))
            .map_err(MetricsError::Register)?;
        registry
            .register(Box::new(responses.clone()))
            .map_err(MetricsError::Register)?;

        #[cfg(target_os = "linux")]
        registry
            .register(Box::new(
                prometheus::process_collector::ProcessCollector::for_self(),
            ))
            .map_err(MetricsError::Register)?;

        Ok(Self {
            registry,
            requests,
            responses,
        })
    }

    /// Count an incoming car request, before any work is done
    pub fn record_request(&self) {
        self.requests.inc();
    }

    pub fn request_count(&self) -> u64 {
        self.requests.get()
    }

    pub fn record_response(&self, route: &str, status: u16) {
        let status = status.to_string();
        self.responses
            .with_label_values(&[route, status.as_str()])
            .inc();
    }

    /// Snapshot every registered metric in text exposition format
    pub fn render(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(MetricsError::Encode)?;
        Ok(String::from_utf8(buffer)?)
    }
}
