use std::fs;
use std::path::Path;

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Certificate, Client, ClientBuilder, Identity, Request, Response, StatusCode};
use rustls::crypto::ring::default_provider;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;
use x509_parser::pem::Pem;

use super::report;
use crate::config::{ProbeConfig, TlsConfig};
use crate::error::ConfigError;

const USER_AGENT: &str = concat!("oxyprobe/", env!("CARGO_PKG_VERSION"));

/// How the single request/response exchange ended.
#[derive(Debug)]
pub enum TransportOutcome {
    Completed(Response),
    /// Redirects are disabled and the server answered with one. Not a failure:
    /// the redirect response itself is what gets classified.
    RedirectBlocked(Response),
    TransportError(reqwest::Error),
}

fn tls_error(path: &Path, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::TlsMaterial {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(|e| tls_error(path, e))
}

/// Make sure a PEM file holds at least one parseable certificate and log what was found.
fn inspect_certificates(path: &Path, pem: &[u8]) -> Result<(), ConfigError> {
    let mut found = 0;
    for entry in Pem::iter_from_buffer(pem) {
        let entry = entry.map_err(|e| tls_error(path, e))?;
        if entry.label != "CERTIFICATE" {
            continue;
        }
        let cert = entry.parse_x509().map_err(|e| tls_error(path, e))?;
        log::debug!(
            "Loaded certificate '{}' from {}, valid until {}",
            cert.subject(),
            path.display(),
            cert.validity().not_after
        );
        found += 1;
    }

    if found == 0 {
        return Err(tls_error(path, "no PEM certificate found"));
    }
    Ok(())
}

/// Reject a client key that does not belong to the client certificate.
fn check_key_pair(
    cert_path: &Path,
    cert_pem: &[u8],
    key_path: &Path,
    key_pem: &[u8],
) -> Result<(), ConfigError> {
    let chain = CertificateDer::pem_slice_iter(cert_pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| tls_error(cert_path, e))?;
    let key = PrivateKeyDer::from_pem_slice(key_pem).map_err(|e| tls_error(key_path, e))?;
    CertifiedKey::from_der(chain, key, &default_provider()).map_err(|e| tls_error(key_path, e))?;
    Ok(())
}

fn apply_tls(mut builder: ClientBuilder, tls: &TlsConfig) -> Result<ClientBuilder, ConfigError> {
    if let Some(ca_path) = &tls.ssl_ca {
        let pem = read_pem(ca_path)?;
        inspect_certificates(ca_path, &pem)?;
        let certs = Certificate::from_pem_bundle(&pem).map_err(|e| tls_error(ca_path, report(&e)))?;
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    match (&tls.ssl_cert, &tls.ssl_key) {
        (Some(cert_path), Some(key_path)) => {
            let mut pem = read_pem(cert_path)?;
            inspect_certificates(cert_path, &pem)?;
            let key_pem = read_pem(key_path)?;
            check_key_pair(cert_path, &pem, key_path, &key_pem)?;
            pem.push(b'\n');
            pem.extend(key_pem);
            let identity = Identity::from_pem(&pem).map_err(|e| tls_error(key_path, report(&e)))?;
            builder = builder.identity(identity);
        }
        (Some(path), None) | (None, Some(path)) => {
            return Err(tls_error(path, "ssl_cert and ssl_key must be configured together"));
        }
        (None, None) => {}
    }

    if tls.insecure_skip_verify {
        // with rustls this also turns off hostname verification
        builder = builder.danger_accept_invalid_certs(true);
    }
    Ok(builder)
}

fn redirect_policy(follow_redirects: bool) -> Policy {
    if follow_redirects {
        return Policy::default();
    }
    Policy::custom(|attempt| {
        log::debug!(
            "Blocked redirect from {} to {}",
            attempt.previous().last().map(|u| u.as_str()).unwrap_or_default(),
            attempt.url()
        );
        attempt.stop()
    })
}

/// Build the HTTP client for one probe run.
/// The connect and overall timeouts both use the configured response timeout.
pub fn build_client(config: &ProbeConfig) -> Result<Client, ConfigError> {
    let timeout = config.effective_timeout();
    let builder = Client::builder()
        .use_rustls_tls()
        .connect_timeout(timeout)
        .timeout(timeout)
        .redirect(redirect_policy(config.follow_redirects))
        .user_agent(USER_AGENT);

    apply_tls(builder, &config.tls)?
        .build()
        .map_err(|e| ConfigError::Client(report(&e)))
}

/// Redirect statuses the client would have followed, given a `Location` to go to.
fn is_redirect_attempt(response: &Response) -> bool {
    matches!(
        response.status(),
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    ) && response.headers().contains_key(LOCATION)
}

/// Send the request and sort the result into a `TransportOutcome`.
pub async fn send(client: &Client, request: Request, follow_redirects: bool) -> TransportOutcome {
    match client.execute(request).await {
        Ok(response) if !follow_redirects && is_redirect_attempt(&response) => {
            TransportOutcome::RedirectBlocked(response)
        }
        Ok(response) => TransportOutcome::Completed(response),
        Err(e) => TransportOutcome::TransportError(e),
    }
}
