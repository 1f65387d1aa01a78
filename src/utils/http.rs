// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};

/// Create a configured asynchronous HTTP client.
///
/// The timeout is absolute: it covers connecting, sending and reading the
/// whole body.
pub fn create_async_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Fetch a URL and return the status code with the body text.
///
/// Transport failures are classified: timeouts become
/// [`AppError::UpstreamTimeout`], everything else
/// [`AppError::UpstreamUnavailable`] without a status.
pub async fn fetch_text(
    client: &reqwest::Client,
    url: Url,
    timeout: Duration,
) -> Result<(u16, String)> {
    let response = client
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| classify_transport(e, timeout))?;
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| classify_transport(e, timeout))?;
    log::debug!("GET {} -> {} ({} bytes)", url, status, text.len());
    Ok((status, text))
}

fn classify_transport(error: reqwest::Error, timeout: Duration) -> AppError {
    if error.is_timeout() {
        AppError::UpstreamTimeout {
            timeout_secs: timeout.as_secs(),
        }
    } else {
        AppError::upstream(error.status().map(|s| s.as_u16()), error)
    }
}

/// Append a path segment to a base URL, keeping the base's own path.
pub fn endpoint(base: &Url, segment: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

/// Whether a status code is in the 2xx range.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
