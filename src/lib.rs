pub mod config;
pub mod error;
pub mod mock;
pub mod store;
pub mod telemetry;
pub mod tui;

pub use error::{ChatbookError, Result};
