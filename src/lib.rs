//! Single-target HTTP/HTTPS health probe.
//!
//! [`run_probe`] issues one request for a [`ProbeConfig`], measures its latency and
//! classifies the response against the configured content, status and latency
//! expectations. Scheduling and shipping the [`ProbeResult`] somewhere is left to the caller.

pub mod config;
pub mod error;
pub mod http_probe;

pub use config::{ProbeConfig, TlsConfig};
pub use error::ConfigError;
pub use http_probe::prelude::*;
