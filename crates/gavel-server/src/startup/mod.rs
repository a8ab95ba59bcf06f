//! Startup utilities: logging and background tasks

mod logging;

pub use logging::init_logging;
