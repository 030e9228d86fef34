//! Multi-threaded stress harness for [`atomic_bitset::ConcurrentBitmap`].

pub mod config;
pub mod error;
pub mod logging;
pub mod scenario;

pub use config::{load_config, parse_config, Config};
pub use error::{ConfigError, StressError};
pub use scenario::{run_fill, run_toggle, Report};
