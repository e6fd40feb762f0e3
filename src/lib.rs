pub mod analytics;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod ingest;
pub mod layers;
pub mod logging;
pub mod pipeline;
pub mod reader;

pub use error::{DataLakeError, Result};
