//! HTTP transport over the platform's REST endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::{debug, warn};
use transparency_core::{Params, Response, Result, Transport, TransparencyError};
use transparency_parse::parse_xml;

/// Production endpoint of the REST API.
pub const DEFAULT_BASE_URL: &str = "https://web-api.tp.entsoe.eu/api";

/// Environment variable holding the security token.
pub const API_KEY_ENV: &str = "ENTSOE_API_KEY";

const NO_MATCHING_DATA: &str = "No matching data found";

/// [`Transport`] that queries the REST API with `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpTransport {
    /// Creates a transport with a 30 second request timeout.
    ///
    /// If the configured client cannot be built, a warning is logged and a
    /// default client without the timeout is used.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = build_client(Client::builder().timeout(Duration::from_secs(30)));
        Self::with_client(client, api_key)
    }

    /// Creates a transport with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Points the transport at another endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Creates a transport with the token from `ENTSOE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`TransparencyError::InvalidParameter`] when the variable is
    /// unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(TransparencyError::InvalidParameter(format!(
                "{API_KEY_ENV} is not set"
            ))),
        }
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn get(&self, params: &Params) -> Result<Response> {
        debug!(?params, url = %self.base_url, "transparency request");

        let response = self
            .client
            .get(&self.base_url)
            .query(params.as_slice())
            .query(&[("securityToken", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| TransparencyError::Network(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response
            .bytes()
            .await
            .map_err(|e| TransparencyError::Network(e.to_string()))?
            .to_vec();

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(?retry_after, "rate limited");
            return Err(TransparencyError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(acknowledgement_error(status, &String::from_utf8_lossy(&body)));
        }
        check_body(Response { content_type, body })
    }
}

fn build_client(builder: ClientBuilder) -> Client {
    match builder.build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "failed to build configured HTTP client, falling back to defaults");
            Client::default()
        }
    }
}

/// Maps a failed response to an error, reading the reason from the
/// acknowledgement document's `text` element when there is one.
fn acknowledgement_error(status: StatusCode, body: &str) -> TransparencyError {
    let Some(text) = parse_xml(body).ok().and_then(|doc| doc.find_text("text")) else {
        return TransparencyError::Network(format!("HTTP {status}: {body}"));
    };
    debug!(%status, %text, "request rejected");
    if text.contains(NO_MATCHING_DATA) {
        TransparencyError::NoMatchingData(text)
    } else if text.contains("check you request against dependency tables") {
        TransparencyError::InvalidBusinessParameter(text)
    } else if text.contains("is not valid for this area") {
        TransparencyError::InvalidPsrType(text)
    } else if text.contains("exceeds allowed limit") || text.contains("exceeds the allowed limit") {
        TransparencyError::Pagination(text)
    } else {
        TransparencyError::Network(format!("HTTP {status}: {text}"))
    }
}

/// Successful XML responses may still be an empty-result acknowledgement.
fn check_body(response: Response) -> Result<Response> {
    let xml = !response.is_zip()
        && response
            .content_type
            .as_deref()
            .is_some_and(|c| c.contains("xml"));
    if xml && response.text()?.contains(NO_MATCHING_DATA) {
        return Err(TransparencyError::NoMatchingData(
            "acknowledgement in successful response".to_string(),
        ));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acknowledgement(text: &str) -> String {
        format!(
            "<Acknowledgement_MarketDocument><Reason><code>999</code>\
             <text>{text}</text></Reason></Acknowledgement_MarketDocument>"
        )
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let transport = HttpTransport::new("secret_key_12345");
        let debug_str = format!("{transport:?}");
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_client_build_failure_falls_back() {
        let builder = Client::builder().user_agent("bad\nagent");
        let transport = HttpTransport::with_client(build_client(builder), "k");
        assert_eq!(transport.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url() {
        let transport = HttpTransport::new("k");
        assert_eq!(transport.base_url(), DEFAULT_BASE_URL);
        let transport = transport.with_base_url("http://localhost:8080/api");
        assert_eq!(transport.base_url(), "http://localhost:8080/api");
        assert_eq!(transport.name(), "HTTP");
    }

    #[test]
    fn test_acknowledgement_reasons() {
        let status = StatusCode::BAD_REQUEST;
        assert!(
            acknowledgement_error(status, &acknowledgement("No matching data found for Data item"))
                .is_no_matching_data()
        );
        assert!(matches!(
            acknowledgement_error(
                status,
                &acknowledgement("Please check you request against dependency tables")
            ),
            TransparencyError::InvalidBusinessParameter(_)
        ));
        assert!(matches!(
            acknowledgement_error(status, &acknowledgement("PsrType B99 is not valid for this area")),
            TransparencyError::InvalidPsrType(_)
        ));
        assert!(matches!(
            acknowledgement_error(
                status,
                &acknowledgement("The amount of requested data exceeds allowed limit of 200 documents")
            ),
            TransparencyError::Pagination(_)
        ));
        assert!(matches!(
            acknowledgement_error(status, "<html>gateway error</html>"),
            TransparencyError::Network(_)
        ));
        assert!(matches!(
            acknowledgement_error(StatusCode::UNAUTHORIZED, "not xml at all"),
            TransparencyError::Network(_)
        ));
    }

    #[test]
    fn test_empty_result_in_successful_response() {
        let response = Response {
            content_type: Some("application/xml".to_string()),
            body: acknowledgement("No matching data found").into_bytes(),
        };
        assert!(check_body(response).unwrap_err().is_no_matching_data());

        let document = Response::xml("<Publication_MarketDocument/>");
        assert!(check_body(document).is_ok());

        let archive = Response::zip(b"PK\x03\x04No matching data found".to_vec());
        assert!(check_body(archive).is_ok());
    }
}
