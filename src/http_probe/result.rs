use std::fmt;

/// Why a probe could not obtain a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    /// The redirect chain could not be completed while following redirects.
    Redirect,
    /// The response started but its body could not be read.
    Body,
    Request,
}

/// What a single probe run ended in, before it is flattened into a `ProbeResult`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Success {
        elapsed: f64,
        http_status: u16,
        content_match: bool,
        status_match: bool,
        latency_match: bool,
        message: Option<String>,
    },
    Failure {
        elapsed: f64,
        kind: FailureKind,
        message: String,
    },
}

/// The record produced by one probe run.
/// A failed run has status `0` and every match flag cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// Seconds from sending the request until the body was read, or until the failure.
    pub response_time: f64,
    /// HTTP status code, `0` when no response was obtained.
    pub http_status: u16,
    pub content_match: bool,
    pub status_match: bool,
    pub latency_match: bool,
    /// Sanitized diagnostic: the transport error, or the body that failed the content match.
    pub message: Option<String>,
    pub failure: Option<FailureKind>,
}

impl From<ProbeOutcome> for ProbeResult {
    fn from(outcome: ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Success {
                elapsed,
                http_status,
                content_match,
                status_match,
                latency_match,
                message,
            } => ProbeResult {
                response_time: elapsed,
                http_status,
                content_match,
                status_match,
                latency_match,
                message,
                failure: None,
            },
            ProbeOutcome::Failure {
                elapsed,
                kind,
                message,
            } => ProbeResult {
                response_time: elapsed,
                http_status: 0,
                content_match: false,
                status_match: false,
                latency_match: false,
                message: Some(message),
                failure: Some(kind),
            },
        }
    }
}

/// A single value in the emitted field set.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Int(i64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl ProbeResult {
    /// True when the content, status and latency expectations all held.
    pub fn is_healthy(&self) -> bool {
        self.content_match && self.status_match && self.latency_match
    }

    /// The measurement fields in the collector's naming, match flags as 0/1.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let flag = |matched: bool| FieldValue::Int(i64::from(matched));
        let mut fields = vec![
            ("response_time", FieldValue::Float(self.response_time)),
            ("http_code", FieldValue::Int(i64::from(self.http_status))),
            ("data_match", flag(self.content_match)),
            ("code_match", flag(self.status_match)),
            ("time_match", flag(self.latency_match)),
        ];
        if let Some(msg) = &self.message {
            fields.push(("msg", FieldValue::Text(msg.clone())));
        }
        fields
    }
}
