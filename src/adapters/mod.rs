pub mod nvme_cli;
pub mod store;

pub use nvme_cli::{NvmeCliConfig, NvmeCliSource};
pub use store::PrometheusSink;
