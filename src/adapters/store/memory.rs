use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::sync::RwLock;

use crate::domain::{CounterKind, DeviceIdentity, DevicePath, GaugeKind, INFO_METRIC_NAME};
use crate::ports::{ExportError, MetricsSink};

/// A single call made against the sink, in call order
#[derive(Debug, Clone, PartialEq)]
pub enum SinkOp {
    SetInfo(DevicePath),
    RetractInfo(DevicePath),
    SetGauge(GaugeKind, DevicePath),
    RetractGauge(GaugeKind, DevicePath),
    Increment(CounterKind),
}

#[derive(Default)]
struct MemoryState {
    info: BTreeMap<DevicePath, Vec<DeviceIdentity>>,
    gauges: BTreeMap<(GaugeKind, DevicePath), f64>,
    counters: HashMap<CounterKind, u64>,
    journal: Vec<SinkOp>,
}

/// In-memory sink that keeps the current series and a journal of every call
#[derive(Default)]
pub struct MemorySink {
    state: RwLock<MemoryState>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn write<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    fn read<R>(&self, f: impl FnOnce(&MemoryState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    pub fn gauge(&self, kind: GaugeKind, path: &DevicePath) -> Option<f64> {
        self.read(|s| s.gauges.get(&(kind, path.clone())).copied())
    }

    /// Number of gauges currently published for a path
    pub fn gauge_count(&self, path: &DevicePath) -> usize {
        self.read(|s| s.gauges.keys().filter(|(_, p)| p == path).count())
    }

    pub fn info(&self, path: &DevicePath) -> Vec<DeviceIdentity> {
        self.read(|s| s.info.get(path).cloned().unwrap_or_default())
    }

    pub fn counter(&self, counter: CounterKind) -> u64 {
        self.read(|s| s.counters.get(&counter).copied().unwrap_or(0))
    }

    pub fn journal(&self) -> Vec<SinkOp> {
        self.read(|s| s.journal.clone())
    }

    pub fn clear_journal(&self) {
        self.write(|s| s.journal.clear());
    }
}

impl MetricsSink for MemorySink {
    fn set_info(&self, path: &DevicePath, identity: &DeviceIdentity) {
        self.write(|s| {
            let series = s.info.entry(path.clone()).or_default();
            if !series.contains(identity) {
                series.push(identity.clone());
            }
            s.journal.push(SinkOp::SetInfo(path.clone()));
        });
    }

    fn retract_info(&self, path: &DevicePath) {
        self.write(|s| {
            s.info.remove(path);
            s.journal.push(SinkOp::RetractInfo(path.clone()));
        });
    }

    fn set_gauge(&self, kind: GaugeKind, path: &DevicePath, value: f64) {
        self.write(|s| {
            s.gauges.insert((kind, path.clone()), value);
            s.journal.push(SinkOp::SetGauge(kind, path.clone()));
        });
    }

    fn retract_gauge(&self, kind: GaugeKind, path: &DevicePath) {
        self.write(|s| {
            s.gauges.remove(&(kind, path.clone()));
            s.journal.push(SinkOp::RetractGauge(kind, path.clone()));
        });
    }

    fn increment_counter(&self, counter: CounterKind) {
        self.write(|s| {
            *s.counters.entry(counter).or_insert(0) += 1;
            s.journal.push(SinkOp::Increment(counter));
        });
    }

    fn export(&self) -> Result<String, ExportError> {
        self.read(|s| render(s).map_err(|e| ExportError(e.to_string())))
    }
}

fn render(s: &MemoryState) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for (path, identities) in &s.info {
        for id in identities {
            writeln!(
                out,
                "{}{{device=\"{}\",model=\"{}\",serial=\"{}\",firmware=\"{}\"}} 1",
                INFO_METRIC_NAME, path, id.model, id.serial, id.firmware
            )?;
        }
    }
    for ((kind, path), value) in &s.gauges {
        writeln!(out, "{}{{device=\"{}\"}} {}", kind.name(), path, value)?;
    }
    for (counter, value) in &s.counters {
        writeln!(out, "{} {}", counter.name(), value)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retract_info_removes_every_identity() {
        let sink = MemorySink::new();
        let path = DevicePath::from("/dev/nvme0n1");

        sink.set_info(&path, &DeviceIdentity::new("A", "1", "f1"));
        sink.set_info(&path, &DeviceIdentity::new("B", "2", "f2"));
        assert_eq!(sink.info(&path).len(), 2);

        sink.retract_info(&path);
        assert!(sink.info(&path).is_empty());
    }

    #[test]
    fn test_export_lists_series() {
        let sink = MemorySink::new();
        let path = DevicePath::from("/dev/nvme0n1");

        sink.set_gauge(GaugeKind::Temperature, &path, 41.0);
        sink.increment_counter(CounterKind::LoopRuns);

        let text = sink.export().unwrap();
        assert!(text.contains("nvme_temperature{device=\"/dev/nvme0n1\"} 41"));
        assert!(text.contains("loop_runs_total 1"));
    }
}
