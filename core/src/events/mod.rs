pub mod handler;
pub mod signal;

pub use handler::DropEvents;
pub use signal::{ClearReason, LogSignal};
