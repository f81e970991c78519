//! Presentation adapters.
//!
//! - `PlainTextRenderer` - Formats steps as chat text
//! - `RenderingActionHandler` - Renders steps and sends them through an output

mod plain_renderer;
mod rendering_action_handler;

pub use plain_renderer::PlainTextRenderer;
pub use rendering_action_handler::{RenderingActionHandler, DEFAULT_ERROR_NOTICE};
