//! Shared plumbing for the hosted-service clients.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{Result, StoreError};

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("frman/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// `base` with each of `segments` appended as an escaped path segment.
pub(crate) fn join_url(base: &str, segments: &[&str]) -> Result<Url> {
    let invalid = |message: String| StoreError::Url {
        url: base.to_string(),
        message,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| invalid("cannot be a base URL".to_string()))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

/// Send `request` and decode a JSON body, turning non-success statuses into
/// [`StoreError::Api`].
pub(crate) fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T> {
    let response = check_status(service, request)?;
    Ok(response.json()?)
}

pub(crate) fn check_status(
    service: &'static str,
    request: RequestBuilder,
) -> Result<reqwest::blocking::Response> {
    let response = request.send()?;
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(StoreError::Api {
            service,
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_escaped() {
        let url = join_url("https://api.airtable.com/v0", &["appBase", "Form Responses"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appBase/Form%20Responses"
        );
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let url = join_url("https://example.test/v4/", &["abc"]).unwrap();
        assert_eq!(url.as_str(), "https://example.test/v4/abc");
    }
}
