use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[derive(Clone)]
pub struct GateMetrics {
    registry: Registry,
    decisions: IntCounterVec,
    config_reloads: IntCounterVec,
}

impl GateMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let decisions = IntCounterVec::new(
            Opts::new(
                "gate_decisions_total",
                "Authorization decisions grouped by outcome and rejection reason",
            ),
            &["outcome", "reason"],
        )?;
        let config_reloads = IntCounterVec::new(
            Opts::new(
                "gate_config_reloads_total",
                "Authorizer configuration reload attempts",
            ),
            &["result"],
        )?;
        registry.register(Box::new(decisions.clone()))?;
        registry.register(Box::new(config_reloads.clone()))?;
        Ok(Self {
            registry,
            decisions,
            config_reloads,
        })
    }

    pub fn record_admitted(&self) {
        self.decisions.with_label_values(&["admitted", "none"]).inc();
    }

    pub fn record_rejected(&self, reason: &str) {
        self.decisions.with_label_values(&["rejected", reason]).inc();
    }

    pub fn record_reload(&self, applied: bool) {
        let result = if applied { "applied" } else { "failed" };
        self.config_reloads.with_label_values(&[result]).inc();
    }

    pub fn decision_count(&self, outcome: &str, reason: &str) -> u64 {
        self.decisions.with_label_values(&[outcome, reason]).get()
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
