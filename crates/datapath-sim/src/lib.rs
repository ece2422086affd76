//! Program loading and reporting for the datapath simulator runner.

use env_logger as _;

/// `.asc` program image parsing.
pub mod loader;
/// Register and memory text reports.
pub mod report;

pub use loader::{load_image_file, parse_image, LoadError};
