// Speech analysis: the analyzer capability, the load-or-compute flow that
// persists results, and the page handler.

pub mod analyzer;
pub mod handlers;
pub mod service;
