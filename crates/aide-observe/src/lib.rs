//! Logging and trace export for the aide binary.

pub mod tracing_setup;

pub use tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
