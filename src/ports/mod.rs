pub mod device_source;
pub mod metrics_sink;

pub use device_source::{DeviceSource, SourceError};
pub use metrics_sink::{ExportError, MetricsSink};
