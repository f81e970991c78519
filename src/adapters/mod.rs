//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to the outside world:
//! - `presentation` - Rendering and the rendering action handler
//! - `output` - Message delivery
//! - `events` - Lifecycle observers

pub mod events;
pub mod output;
pub mod presentation;

pub use events::{RecordingEventHandler, TracingEventHandler};
pub use output::InMemoryOutput;
pub use presentation::{PlainTextRenderer, RenderingActionHandler};
