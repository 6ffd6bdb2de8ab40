pub mod http;
pub mod signals;
