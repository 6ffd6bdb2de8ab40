use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Device, DevicePath};

/// Device inventory or telemetry could not be obtained
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("unexpected device list output: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Port for fetching the device inventory and raw per-device telemetry
#[async_trait]
pub trait DeviceSource: Send + Sync {
    /// List devices in the order the backend reports them
    async fn list_devices(&self) -> Result<Vec<Device>, SourceError>;

    /// Fetch the raw smart-log blob for one device
    async fn get_telemetry(&self, path: &DevicePath) -> Result<Vec<u8>, SourceError>;
}
