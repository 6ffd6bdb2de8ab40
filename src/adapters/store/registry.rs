use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[cfg(target_os = "linux")]
use prometheus::process_collector::ProcessCollector;
use prometheus::{Encoder, GaugeVec, IntCounter, Opts, Registry, TextEncoder};
use thiserror::Error;

use crate::domain::{CounterKind, DeviceIdentity, DevicePath, GaugeKind, INFO_METRIC_HELP, INFO_METRIC_NAME};
use crate::ports::{ExportError, MetricsSink};

const DEVICE_LABEL: &str = "device";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to register metric: {0}")]
    Registry(#[from] prometheus::Error),
}

/// Metrics sink backed by a dedicated prometheus registry
pub struct PrometheusSink {
    registry: Registry,
    info: GaugeVec,
    /// Indexed by `GaugeKind as usize`
    gauges: Vec<GaugeVec>,
    loop_runs: IntCounter,
    /// Info label sets published per path, so they can be removed without
    /// knowing the identity that was current at the time
    published_info: Mutex<HashMap<DevicePath, HashSet<DeviceIdentity>>>,
}

impl PrometheusSink {
    pub fn new() -> Result<Self, SinkError> {
        let registry = Registry::new();

        let info = GaugeVec::new(
            Opts::new(INFO_METRIC_NAME, INFO_METRIC_HELP),
            &[DEVICE_LABEL, "model", "serial", "firmware"],
        )?;
        registry.register(Box::new(info.clone()))?;

        let mut gauges = Vec::with_capacity(GaugeKind::ALL.len());
        for kind in GaugeKind::ALL {
            let vec = GaugeVec::new(Opts::new(kind.name(), kind.help()), &[DEVICE_LABEL])?;
            registry.register(Box::new(vec.clone()))?;
            gauges.push(vec);
        }

        let loop_runs = IntCounter::new(CounterKind::LoopRuns.name(), CounterKind::LoopRuns.help())?;
        registry.register(Box::new(loop_runs.clone()))?;

        // process_* series for the exporter itself
        #[cfg(target_os = "linux")]
        registry.register(Box::new(ProcessCollector::for_self()))?;

        Ok(Self {
            registry,
            info,
            gauges,
            loop_runs,
            published_info: Mutex::new(HashMap::new()),
        })
    }

    fn gauge_vec(&self, kind: GaugeKind) -> &GaugeVec {
        &self.gauges[kind as usize]
    }

    fn counter(&self, counter: CounterKind) -> &IntCounter {
        match counter {
            CounterKind::LoopRuns => &self.loop_runs,
        }
    }
}

impl MetricsSink for PrometheusSink {
    fn set_info(&self, path: &DevicePath, identity: &DeviceIdentity) {
        let mut published = self.published_info.lock().unwrap_or_else(|e| e.into_inner());
        published.entry(path.clone()).or_default().insert(identity.clone());

        self.info
            .with_label_values(&[
                path.as_str(),
                identity.model.as_str(),
                identity.serial.as_str(),
                identity.firmware.as_str(),
            ])
            .set(1.0);
    }

    fn retract_info(&self, path: &DevicePath) {
        let mut published = self.published_info.lock().unwrap_or_else(|e| e.into_inner());
        let Some(identities) = published.remove(path) else {
            return;
        };

        for identity in identities {
            let _ = self.info.remove_label_values(&[
                path.as_str(),
                identity.model.as_str(),
                identity.serial.as_str(),
                identity.firmware.as_str(),
            ]);
        }
    }

    fn set_gauge(&self, kind: GaugeKind, path: &DevicePath, value: f64) {
        self.gauge_vec(kind).with_label_values(&[path.as_str()]).set(value);
    }

    fn retract_gauge(&self, kind: GaugeKind, path: &DevicePath) {
        // absent series are fine
        let _ = self.gauge_vec(kind).remove_label_values(&[path.as_str()]);
    }

    fn increment_counter(&self, counter: CounterKind) {
        self.counter(counter).inc();
    }

    fn export(&self) -> Result<String, ExportError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| ExportError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| ExportError(e.to_string()))
    }
}
