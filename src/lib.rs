pub mod client;
pub mod config;
pub mod dsl;
pub mod error;
pub mod graph;
pub mod interpreter;
pub mod runtime;
pub mod server;
pub mod share;
pub mod viewer;

pub use error::{GenerationError, Result};
