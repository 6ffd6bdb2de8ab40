use serde::Deserialize;

use crate::domain::{Device, DeviceCapacity, DeviceIdentity, DevicePath};

/// `nvme list -o json`
#[derive(Debug, Deserialize)]
struct RawDeviceList {
    #[serde(rename = "Devices", default)]
    devices: Vec<RawDevice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDevice {
    device_path: String,
    #[serde(default)]
    firmware: String,
    #[serde(default)]
    model_number: String,
    #[serde(default)]
    serial_number: String,
    #[serde(default)]
    used_bytes: u64,
    #[serde(rename = "MaximumLBA", default)]
    maximum_lba: u64,
    #[serde(default)]
    physical_size: u64,
    #[serde(default)]
    sector_size: u64,
}

impl From<RawDevice> for Device {
    fn from(raw: RawDevice) -> Self {
        // nvme-cli pads model and serial to their fixed field widths
        let identity = DeviceIdentity::new(
            raw.model_number.trim(),
            raw.serial_number.trim(),
            raw.firmware.trim(),
        );

        Device::new(DevicePath::new(raw.device_path.trim()), identity).with_capacity(DeviceCapacity {
            used_bytes: raw.used_bytes,
            maximum_lba: raw.maximum_lba,
            physical_size: raw.physical_size,
            sector_size: raw.sector_size,
        })
    }
}

/// Parse the device inventory, keeping the order nvme-cli reported
pub fn parse_device_list(data: &[u8]) -> Result<Vec<Device>, serde_json::Error> {
    let list: RawDeviceList = serde_json::from_slice(data)?;
    Ok(list.devices.into_iter().map(Device::from).collect())
}
