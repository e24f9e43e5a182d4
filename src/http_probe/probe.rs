use std::time::Instant;

use reqwest::{Client, Request};

use super::matcher::{latency_matches, pattern_matches};
use super::report;
use super::request::build_request;
use super::result::{FailureKind, ProbeOutcome, ProbeResult};
use super::sanitize::sanitize_message;
use super::transport::{TransportOutcome, build_client, send};
use crate::config::ProbeConfig;
use crate::error::ConfigError;

fn failure_kind(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() {
        FailureKind::Connect
    } else if err.is_redirect() {
        FailureKind::Redirect
    } else if err.is_body() || err.is_decode() {
        FailureKind::Body
    } else {
        FailureKind::Request
    }
}

fn failed(start: Instant, err: &reqwest::Error) -> ProbeOutcome {
    ProbeOutcome::Failure {
        elapsed: start.elapsed().as_secs_f64(),
        kind: failure_kind(err),
        message: sanitize_message(&report(err)),
    }
}

/// Evaluate the content, status and latency expectations against an obtained response.
pub fn classify(config: &ProbeConfig, elapsed: f64, http_status: u16, body: &str) -> ProbeOutcome {
    let content_match = pattern_matches(config.content_pattern(), body);
    let status_match = pattern_matches(config.status_pattern(), &http_status.to_string());
    let latency_match = latency_matches(elapsed, config.latency_threshold());

    // the body that failed the content check is kept for diagnosis
    let message = (!content_match).then(|| sanitize_message(body));

    ProbeOutcome::Success {
        elapsed,
        http_status,
        content_match,
        status_match,
        latency_match,
        message,
    }
}

/// Time one request/response exchange on `client` and classify it.
/// Transport failures are folded into `ProbeOutcome::Failure`; this never returns an error.
pub async fn execute_probe(client: &Client, request: Request, config: &ProbeConfig) -> ProbeOutcome {
    let start = Instant::now();

    let response = match send(client, request, config.follow_redirects).await {
        TransportOutcome::Completed(response) => response,
        TransportOutcome::RedirectBlocked(response) => {
            log::debug!(
                "Redirect from {} not followed, classifying status {}",
                config.address,
                response.status()
            );
            response
        }
        TransportOutcome::TransportError(e) => {
            log::warn!("Probe of {} failed: {}", config.address, e);
            return failed(start, &e);
        }
    };

    let http_status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Reading response body from {} failed: {}", config.address, e);
            return failed(start, &e);
        }
    };
    let elapsed = start.elapsed().as_secs_f64();

    classify(config, elapsed, http_status, &body)
}

/// Run a complete probe: build the request and client, execute, classify.
/// Only malformed configuration is returned as an error; network failures are part of the result.
pub async fn run_probe(config: &ProbeConfig) -> Result<ProbeResult, ConfigError> {
    let request = build_request(config)?;
    let client = build_client(config)?;

    let result = ProbeResult::from(execute_probe(&client, request, config).await);
    log::debug!(
        "Probe of {} finished: status {}, data_match {}, code_match {}, time_match {}, {:.3}s",
        config.address,
        result.http_status,
        result.content_match,
        result.status_match,
        result.latency_match,
        result.response_time
    );
    Ok(result)
}
