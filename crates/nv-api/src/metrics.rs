//! Prometheus registry for the `/metrics` endpoint.
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub struct ApiMetrics {
    registry: Registry,
    requests: IntCounterVec,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new("nv_http_requests_total", "HTTP requests served"),
            &["method", "status"],
        )?;
        registry.register(Box::new(requests.clone()))?;
        Ok(Self { registry, requests })
    }

    pub fn observe(&self, method: &str, status: u16) {
        self.requests
            .with_label_values(&[method, &status.to_string()])
            .inc();
    }

    pub fn request_count(&self, method: &str, status: u16) -> u64 {
        self.requests
            .with_label_values(&[method, &status.to_string()])
            .get()
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_is_exported() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.observe("GET", 200);
        metrics.observe("GET", 200);
        metrics.observe("POST", 400);

        assert_eq!(metrics.request_count("GET", 200), 2);
        let text = metrics.encode().unwrap();
        assert!(text.contains("nv_http_requests_total"));
        assert!(text.contains("status=\"400\""));
    }
}
