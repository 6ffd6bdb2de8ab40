use thiserror::Error;

use crate::domain::{CounterKind, DeviceIdentity, DevicePath, GaugeKind};

#[derive(Debug, Error)]
#[error("failed to encode metrics: {0}")]
pub struct ExportError(pub String);

/// Port for the gauge/counter registry.
///
/// Implementations are internally synchronized: the reconciler writes while
/// the HTTP endpoint exports concurrently, and neither side holds a lock
/// around these calls.
pub trait MetricsSink: Send + Sync {
    /// Publish the info series for a path with its identity labels
    fn set_info(&self, path: &DevicePath, identity: &DeviceIdentity);

    /// Remove every info series for a path, whatever its identity labels
    fn retract_info(&self, path: &DevicePath);

    fn set_gauge(&self, kind: GaugeKind, path: &DevicePath, value: f64);

    fn retract_gauge(&self, kind: GaugeKind, path: &DevicePath);

    fn increment_counter(&self, counter: CounterKind);

    /// Render all series in the text exposition format
    fn export(&self) -> Result<String, ExportError>;

    /// Remove the info series and every gauge for a path
    fn retract_device(&self, path: &DevicePath) {
        self.retract_info(path);
        for kind in GaugeKind::ALL {
            self.retract_gauge(kind, path);
        }
    }
}
