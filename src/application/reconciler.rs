use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::{Device, DeviceHealth, DeviceIdentity, DevicePath};
use crate::ports::{DeviceSource, MetricsSink, SourceError};

use super::normalizer::{self, TelemetryError};

/// Why a single device was skipped for a cycle
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Keeps published series in line with the current device inventory.
///
/// Two maps survive across cycles: presence flags for every known path, and
/// the identity last published for each path. A path that is not re-marked
/// during a cycle has all of its series retracted at the end of that cycle.
pub struct Reconciler {
    source: Arc<dyn DeviceSource>,
    sink: Arc<dyn MetricsSink>,
    known_devices: HashMap<DevicePath, bool>,
    last_seen: HashMap<DevicePath, DeviceIdentity>,
}

impl Reconciler {
    pub fn new(source: Arc<dyn DeviceSource>, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            source,
            sink,
            known_devices: HashMap::new(),
            last_seen: HashMap::new(),
        }
    }

    /// Run one cycle over the full inventory.
    ///
    /// Returns `true` only if the inventory was listed and every device was
    /// refreshed. A failed listing leaves all state untouched.
    pub async fn reconcile_cycle(&mut self) -> bool {
        let devices = match self.source.list_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                error!("Failed to list devices: {}", e);
                return false;
            }
        };

        let mut has_errors = false;

        for device in &devices {
            let health = match self.fetch_health(&device.path).await {
                Ok(health) => health,
                Err(e) => {
                    error!(device = %device.path, "Failed to refresh device: {}", e);
                    has_errors = true;
                    continue;
                }
            };

            self.known_devices.insert(device.path.clone(), true);
            self.publish(device, &health);
        }

        let evicted = self.evict_absent();

        debug!(
            listed = devices.len(),
            known = self.known_devices.len(),
            evicted,
            degraded = has_errors,
            "Reconcile cycle finished"
        );

        !has_errors
    }

    async fn fetch_health(&self, path: &DevicePath) -> Result<DeviceHealth, DeviceError> {
        let raw = self.source.get_telemetry(path).await?;
        Ok(normalizer::normalize(&raw)?)
    }

    fn publish(&mut self, device: &Device, health: &DeviceHealth) {
        let path = &device.path;

        // Same path, different drive: drop the old info labels so the two
        // identities never show up side by side.
        if let Some(previous) = self.last_seen.get(path) {
            if previous != &device.identity {
                info!(
                    device = %path,
                    old_serial = %previous.serial,
                    new_serial = %device.identity.serial,
                    "Device identity changed"
                );
                self.sink.retract_info(path);
            }
        }

        self.last_seen.insert(path.clone(), device.identity.clone());
        self.sink.set_info(path, &device.identity);

        for (kind, value) in device.capacity.readings().into_iter().chain(health.readings()) {
            self.sink.set_gauge(kind, path, value);
        }
    }

    /// Clear presence flags for devices seen this cycle and retract the rest
    fn evict_absent(&mut self) -> usize {
        let mut absent = Vec::new();
        for (path, present) in self.known_devices.iter_mut() {
            if *present {
                *present = false;
            } else {
                absent.push(path.clone());
            }
        }

        for path in &absent {
            info!(device = %path, "Device disappeared, retracting its series");
            self.known_devices.remove(path);
            self.last_seen.remove(path);
            self.sink.retract_device(path);
        }

        absent.len()
    }
}
