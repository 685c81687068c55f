//! Ferrous DNS64 Infrastructure Layer
pub mod dns;
