// Library entry point for blockgraph.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use error::{BlockGraphError, Result};
