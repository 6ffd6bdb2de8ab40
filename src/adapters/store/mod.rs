#[cfg(test)]
pub mod memory;
pub mod registry;

#[cfg(test)]
pub use memory::{MemorySink, SinkOp};
pub use registry::PrometheusSink;
