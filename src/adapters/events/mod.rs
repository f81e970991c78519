//! Lifecycle event adapters.
//!
//! - `RecordingEventHandler` - Keeps events and snapshots for inspection
//! - `TracingEventHandler` - Logs events through `tracing`

mod recording;
mod tracing_handler;

pub use recording::RecordingEventHandler;
pub use tracing_handler::TracingEventHandler;
