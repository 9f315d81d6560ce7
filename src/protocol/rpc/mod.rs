//! Request-independent state handed to every operation handler.

mod context;

pub use context::Context;
