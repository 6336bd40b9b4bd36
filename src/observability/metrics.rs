use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Dispatcher metrics
    pub tokens_issued: IntCounterVec,
    pub token_failures: IntCounterVec,
    pub request_duration: HistogramVec,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("tokenbroker".into()), None)?;

        let metrics = Self {
            tokens_issued: IntCounterVec::new(Opts::new("tokens_issued_total", "Tokens issued by request kind"), &["kind"])?,
            token_failures: IntCounterVec::new(Opts::new("token_failures_total", "Rejected or failed token requests"), &["kind", "reason"])?,
            request_duration: HistogramVec::new(HistogramOpts::new("request_duration_seconds", "Token request handling time").buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1]), &["kind"])?,
            up: IntGauge::new("up", "1 if service is serving")?,
            registry,
        };

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.tokens_issued.clone()))?;
        reg.register(Box::new(metrics.token_failures.clone()))?;
        reg.register(Box::new(metrics.request_duration.clone()))?;
        reg.register(Box::new(metrics.up.clone()))?;

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_prefixed() {
        let metrics = Metrics::new().unwrap();
        metrics.tokens_issued.with_label_values(&["login"]).inc();
        metrics.up.set(1);

        let text = prometheus::TextEncoder::new()
            .encode_to_string(&metrics.registry.gather())
            .unwrap();
        assert!(text.contains("tokenbroker_tokens_issued_total{kind=\"login\"} 1"));
        assert!(text.contains("tokenbroker_up 1"));
    }

    #[test]
    fn instances_do_not_share_registries() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.tokens_issued.with_label_values(&["join"]).inc();
        assert_eq!(b.tokens_issued.with_label_values(&["join"]).get(), 0);
    }
}
