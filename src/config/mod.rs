pub mod app_config;
pub mod probe_config;

pub use app_config::{load_config, parse_config};
pub use probe_config::{ProbeConfig, TlsConfig};
