//! Prometheus metrics for simulation runs.

use prometheus::{Counter, Gauge, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub firings: Counter,
    pub advances: Counter,
    pub logical_time: Gauge,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let firings = Counter::new("taktnet_firings_total", "Total transition firings").unwrap();
        let advances = Counter::new("taktnet_advances_total", "Total clock advances").unwrap();
        let logical_time =
            Gauge::new("taktnet_logical_time", "Accumulated logical simulation time").unwrap();

        registry.register(Box::new(firings.clone())).unwrap();
        registry.register(Box::new(advances.clone())).unwrap();
        registry.register(Box::new(logical_time.clone())).unwrap();

        Self {
            registry,
            firings,
            advances,
            logical_time,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }

    pub fn record_firing(&self) {
        self.firings.inc();
    }

    pub fn record_advance(&self, time: f64) {
        self.advances.inc();
        self.logical_time.set(time);
    }
}
