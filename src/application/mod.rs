pub mod backoff;
pub mod normalizer;
pub mod reconciler;
pub mod scheduler;
pub mod status;

pub use backoff::Backoff;
pub use reconciler::Reconciler;
pub use scheduler::PollScheduler;
pub use status::PollStatus;
