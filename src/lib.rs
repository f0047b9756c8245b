// lib.rs

pub use std::time::Duration;

pub use anyhow::bail;
pub use serde::Serialize;

mod config;
pub use config::*;

mod reading;
pub use reading::*;

mod sensor;
pub use sensor::*;

mod dht22;
pub use dht22::*;

mod retry;
pub use retry::*;

mod mqtt;
pub use mqtt::*;

mod webhook;
pub use webhook::*;

mod reporter;
pub use reporter::*;

#[cfg(target_os = "espidf")]
mod wifi;
#[cfg(target_os = "espidf")]
pub use wifi::*;


pub const FW_VERSION: &str = env!("CARGO_PKG_VERSION");

// EOF
