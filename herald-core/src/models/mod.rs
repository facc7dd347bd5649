//! Data models for herald

pub mod configuration;
pub mod message;

pub use configuration::*;
pub use message::*;
