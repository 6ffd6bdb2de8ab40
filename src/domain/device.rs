use std::fmt;

use super::GaugeKind;

/// Device node path, the key every per-device series is labeled with
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DevicePath(String);

impl DevicePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DevicePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl From<&str> for DevicePath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// Identity tuple used to detect a drive swap behind an unchanged path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceIdentity {
    pub model: String,
    pub serial: String,
    pub firmware: String,
}

impl DeviceIdentity {
    pub fn new(model: impl Into<String>, serial: impl Into<String>, firmware: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            serial: serial.into(),
            firmware: firmware.into(),
        }
    }
}

/// Point-in-time capacity facts, replaced wholesale each cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceCapacity {
    pub used_bytes: u64,
    pub maximum_lba: u64,
    pub physical_size: u64,
    pub sector_size: u64,
}

impl DeviceCapacity {
    pub fn readings(&self) -> [(GaugeKind, f64); 4] {
        [
            (GaugeKind::UsedBytes, self.used_bytes as f64),
            (GaugeKind::MaximumLba, self.maximum_lba as f64),
            (GaugeKind::PhysicalSize, self.physical_size as f64),
            (GaugeKind::SectorSize, self.sector_size as f64),
        ]
    }
}

/// One entry of the device inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub path: DevicePath,
    pub identity: DeviceIdentity,
    pub capacity: DeviceCapacity,
}

impl Device {
    pub fn new(path: DevicePath, identity: DeviceIdentity) -> Self {
        Self {
            path,
            identity,
            capacity: DeviceCapacity::default(),
        }
    }

    pub fn with_capacity(mut self, capacity: DeviceCapacity) -> Self {
        self.capacity = capacity;
        self
    }
}
