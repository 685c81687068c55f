#![allow(dead_code)]

pub mod messages;
pub mod mocks;

pub use messages::*;
pub use mocks::*;
