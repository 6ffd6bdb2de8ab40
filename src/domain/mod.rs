pub mod device;
pub mod gauge;
pub mod health;

pub use device::{Device, DeviceCapacity, DeviceIdentity, DevicePath};
pub use gauge::{CounterKind, GaugeKind, INFO_METRIC_HELP, INFO_METRIC_NAME};
pub use health::DeviceHealth;
