//! Ferrous DNS64 Application Layer
pub mod ports;
pub mod use_cases;
