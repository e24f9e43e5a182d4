use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Response timeout used when none is configured or the configured one is below a second.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A single HTTP probe configuration.
/// Immutable for the duration of a run; field names follow the collector's config keys.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// The URL to probe. Only http and https are accepted.
    #[serde(default = "default_address")]
    pub address: String,

    /// The HTTP method, e.g. GET or POST.
    #[serde(default = "default_method")]
    pub method: String,

    /// Optional request payload.
    /// For GET requests it is appended to the address as the query string instead.
    #[serde(default)]
    pub body: Option<String>,

    /// Extra request headers. A `Host` entry also overrides the virtual host.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response timeout in seconds. Values below one second fall back to five seconds.
    #[serde(default)]
    pub response_timeout: Option<f64>,

    /// Whether redirects are followed. When disabled the first redirect response is kept.
    #[serde(default)]
    pub follow_redirects: bool,

    /// Expected response body content, as a regex or a plain substring.
    #[serde(default)]
    pub require_str: Option<String>,

    /// Expected status code, as a regex or a plain substring of the decimal code.
    #[serde(default)]
    pub require_code: Option<String>,

    /// Latency threshold in seconds. Defaults to the effective response timeout.
    /// Unlike the url_monitor collector, where an unset threshold was zero and every
    /// response counted as too slow, leaving this out only flags responses slower than the timeout.
    #[serde(default)]
    pub failed_timeout: Option<f64>,

    /// Number of consecutive failures the alerting side should tolerate.
    /// Forwarded to the output untouched.
    #[serde(default)]
    pub failed_count: u32,

    #[serde(flatten)]
    pub tls: TlsConfig,

    #[serde(default)]
    pub app: String,

    #[serde(default)]
    pub cmdbid: String,

    /// Free-form identity labels attached to the output tags.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// TLS material for the probe client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    /// Path to a PEM encoded CA bundle added to the trust store.
    #[serde(default)]
    pub ssl_ca: Option<PathBuf>,

    /// Path to a PEM encoded client certificate.
    #[serde(default)]
    pub ssl_cert: Option<PathBuf>,

    /// Path to the PEM encoded private key belonging to `ssl_cert`.
    #[serde(default)]
    pub ssl_key: Option<PathBuf>,

    /// Use TLS but skip chain and hostname verification.
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

fn default_address() -> String {
    "http://localhost".to_string()
}

fn default_method() -> String {
    "GET".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            address: default_address(),
            method: default_method(),
            body: None,
            headers: HashMap::new(),
            response_timeout: None,
            follow_redirects: false,
            require_str: None,
            require_code: None,
            failed_timeout: None,
            failed_count: 0,
            tls: TlsConfig::default(),
            app: String::new(),
            cmdbid: String::new(),
            labels: BTreeMap::new(),
        }
    }
}

impl ProbeConfig {
    /// The timeout applied to both the response headers and the whole exchange.
    pub fn effective_timeout(&self) -> Duration {
        match self.response_timeout {
            Some(secs) if secs.is_finite() && secs >= 1.0 => Duration::from_secs_f64(secs),
            _ => DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// The latency threshold in seconds used for the time match.
    pub fn latency_threshold(&self) -> f64 {
        self.failed_timeout
            .unwrap_or_else(|| self.effective_timeout().as_secs_f64())
    }

    /// The content pattern, if a non-empty one is configured.
    pub fn content_pattern(&self) -> Option<&str> {
        self.require_str.as_deref().filter(|p| !p.is_empty())
    }

    /// The status pattern, if a non-empty one is configured.
    pub fn status_pattern(&self) -> Option<&str> {
        self.require_code.as_deref().filter(|p| !p.is_empty())
    }

    /// The request body, if a non-empty one is configured.
    pub fn request_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }

    /// Identity tags attached to every result of this probe.
    /// Free-form labels never replace the built-in `app`, `cmdbid`, `url` and `method` tags.
    pub fn tags(&self) -> BTreeMap<String, String> {
        let mut tags = self.labels.clone();
        tags.insert("app".to_string(), self.app.clone());
        tags.insert("cmdbid".to_string(), self.cmdbid.clone());
        tags.insert("url".to_string(), self.address.clone());
        tags.insert("method".to_string(), self.method.clone());
        tags
    }

    /// Expectation fields echoed next to the measurements, so dashboards can show
    /// what a probe was checked against at the time.
    /// `require_time` is written in full (`0.25`, `5`), not rounded to one significant
    /// digit as the url_monitor collector did.
    pub fn echo_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("require_code", self.require_code.clone().unwrap_or_default()),
            ("require_str", self.require_str.clone().unwrap_or_default()),
            ("require_time", self.latency_threshold().to_string()),
            ("failed_threshold", self.failed_count.to_string()),
        ]
    }
}
