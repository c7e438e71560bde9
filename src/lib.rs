pub mod core;
pub mod algos;
pub mod config;
mod driver;

pub use driver::*;
pub use crate::core::crypto::*;
pub use config::{AuthConfig, ConfigError, KeyConfig};

#[cfg(test)]
pub mod testutil;
pub mod ext;
