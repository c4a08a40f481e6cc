//! Logging and in-process metrics for the MyDNA tools
//!
//! - Structured logging with tracing, compact or JSON, always on stderr
//! - Counters and timing histograms for scans and profile operations
//! - A session id attached to every run

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global metrics registry
static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with default settings
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize with custom configuration
///
/// `RUST_LOG` overrides `log_level` when set. Fails if a global
/// subscriber is already installed.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target),
            )
            .try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive, e.g. `warn` or `mydna_matching=debug`
    pub log_level: String,
    /// Emit one JSON object per event instead of compact text
    pub json: bool,
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Raise the level to `debug` when running verbose
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.log_level = "debug".to_string();
        }
        self
    }
}

/// Metrics registry for counters and timing histograms
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, AtomicU64>>,
    histograms: RwLock<HashMap<String, Vec<f64>>>,
    start_time: Instant,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            histograms: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Increment a counter
    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    /// Increment a counter by a specific amount
    pub fn increment_by(&self, name: &str, value: u64) {
        {
            let counters = self.counters.read().unwrap_or_else(|e| e.into_inner());
            if let Some(counter) = counters.get(name) {
                counter.fetch_add(value, Ordering::Relaxed);
                return;
            }
        }
        let mut counters = self.counters.write().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Current value of a counter, zero if never incremented
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Record a histogram value
    pub fn histogram(&self, name: &str, value: f64) {
        let mut histograms = self.histograms.write().unwrap_or_else(|e| e.into_inner());
        histograms.entry(name.to_string()).or_default().push(value);
    }

    /// Get uptime in milliseconds
    pub fn uptime_ms(&self) -> u64 {
        u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Value {
        let counters = self.counters.read().unwrap_or_else(|e| e.into_inner());
        let histograms = self.histograms.read().unwrap_or_else(|e| e.into_inner());

        let counter_values: HashMap<&str, u64> = counters
            .iter()
            .map(|(k, v)| (k.as_str(), v.load(Ordering::Relaxed)))
            .collect();

        let histogram_stats: HashMap<&str, HistogramStats> = histograms
            .iter()
            .map(|(k, v)| (k.as_str(), HistogramStats::from_values(v)))
            .collect();

        serde_json::json!({
            "session_id": session_id(),
            "uptime_ms": self.uptime_ms(),
            "counters": counter_values,
            "histograms": histogram_stats,
        })
    }
}

/// Histogram statistics
#[derive(Debug, Serialize)]
pub struct HistogramStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
}

impl HistogramStats {
    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                p50: 0.0,
                p95: 0.0,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();

        Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sum / count as f64,
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Get the global metrics registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

/// Timer for measuring operation duration
///
/// The duration is recorded in milliseconds under the timer's name, either
/// by [`Timer::stop`] or when the timer is dropped.
pub struct Timer {
    name: String,
    start: Instant,
    recorded: bool,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Stop the timer and record the duration
    pub fn stop(mut self) -> Duration {
        let duration = self.record();
        tracing::debug!(
            metric = %self.name,
            duration_ms = duration.as_millis(),
            "Timer completed"
        );
        duration
    }

    fn record(&mut self) -> Duration {
        let duration = self.start.elapsed();
        if !self.recorded {
            metrics().histogram(&self.name, duration.as_secs_f64() * 1000.0);
            self.recorded = true;
        }
        duration
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.record();
    }
}
