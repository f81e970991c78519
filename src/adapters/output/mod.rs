//! Output adapters.
//!
//! - `InMemoryOutput` - Captures messages for tests and local runs

mod in_memory;

pub use in_memory::InMemoryOutput;
