// gwrotate-api: Async Rust client for the MikroTik RouterOS REST API

pub mod client;
pub mod error;
pub mod firewall;
pub mod interfaces;
pub mod ip;
pub mod models;
pub mod tool;
pub mod transport;
pub mod wireless;

pub use client::{RouterOsClient, WirelessMenu};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
