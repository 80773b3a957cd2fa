pub mod acquisition;
pub mod config;
pub mod error;
pub mod export;
pub mod sensor;
pub mod visualization;

pub use error::{MonitorError, Result};
