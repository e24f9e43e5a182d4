use reqwest::header::{CONTENT_TYPE, HOST, HeaderName, HeaderValue};
use reqwest::{Body, Method, Request};
use url::Url;

use crate::config::ProbeConfig;
use crate::error::ConfigError;

/// Content type attached when the configured headers do not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Parse and validate the probe address. Only http and https are accepted.
pub fn parse_address(address: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(address).map_err(|e| ConfigError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidAddress {
            address: address.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(url)
}

fn parse_method(method: &str) -> Result<Method, ConfigError> {
    if method.is_empty() {
        return Err(ConfigError::InvalidMethod(method.to_string()));
    }
    Method::from_bytes(method.as_bytes()).map_err(|_| ConfigError::InvalidMethod(method.to_string()))
}

/// Append a GET payload to the address as written, after any query already present.
/// Characters that cannot appear in a request target (such as spaces) and `'` still come
/// out percent-encoded, since the URL is re-serialized before it is sent.
fn append_query(mut url: Url, payload: &str) -> Result<Url, ConfigError> {
    // fragments never leave the client, the payload belongs to the query
    url.set_fragment(None);
    let separator = match url.query() {
        Some("") => "",
        Some(_) => "&",
        None => "?",
    };
    let joined = format!("{}{separator}{payload}", url.as_str());
    Url::parse(&joined).map_err(|e| ConfigError::InvalidAddress {
        address: joined.clone(),
        reason: e.to_string(),
    })
}

/// Build the outbound request for a probe.
///
/// A GET never carries a body: a configured payload becomes the query string instead.
/// Other methods send the payload verbatim. A `Host` header replaces the virtual host
/// rather than being appended, and a form content type is added unless one was configured.
pub fn build_request(config: &ProbeConfig) -> Result<Request, ConfigError> {
    let method = parse_method(&config.method)?;
    let mut url = parse_address(&config.address)?;

    let body = config.request_body();
    let is_get = method == Method::GET;
    if let (Some(payload), true) = (body, is_get) {
        url = append_query(url, payload)?;
    }

    let mut request = Request::new(method, url);

    let mut has_content_type = false;
    for (name, value) in &config.headers {
        let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        if name.eq_ignore_ascii_case("host") {
            request.headers_mut().insert(HOST, header_value);
            continue;
        }

        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        has_content_type |= header_name == CONTENT_TYPE;
        request.headers_mut().append(header_name, header_value);
    }

    if !has_content_type {
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }

    if let (Some(payload), false) = (body, is_get) {
        *request.body_mut() = Some(Body::from(payload.to_string()));
    }

    log::debug!("Built {} request for {}", request.method(), request.url());
    Ok(request)
}
