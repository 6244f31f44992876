//! A single request to a remote "what is my IP" service.

use crate::address::{Address, Family};
use crate::error::{BoxError, Error as ErrorCommon, ExternalService, NetworkSide};
use crate::sources::Error;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use futures::io::AsyncReadExt;
use isahc::config::{Configurable, IpVersion, SslOption};
use tracing::debug;

/// The maximum number of bytes read from a response body; it's enough for any
/// textual IP address with some surrounding whitespace.
const MAX_BODY_LEN: u64 = 48;

/// A remote service which answers with the IP address of the client that
/// sends the request.
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    /// The URL to request.
    pub url: String,
    /// The IP family that the connection must use. `None` lets the HTTP client
    /// choose.
    pub transport: Option<Family>,
    /// The maximum time that a request to this endpoint may last.
    pub timeout: Duration,
}

impl Endpoint {
    /// Creates an endpoint for `url`.
    pub fn new(url: &str, transport: Option<Family>, timeout: Duration) -> Self {
        Self {
            url: String::from(url),
            transport,
            timeout,
        }
    }
}

/// The result of probing one endpoint.
pub type ProbeOutcome = Result<Address, Error>;

/// Each implementation performs one request to an endpoint for finding out the
/// IP address that the endpoint sees.
///
/// Implementations report every failure through the returned outcome; they
/// never panic.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, endpoint: &Endpoint) -> ProbeOutcome;
}

/// Probes the endpoints through HTTP(S).
///
/// The server certificates aren't validated because the only information
/// extracted from the response is the IP address in plain text; don't use it
/// for requesting any authenticated data.
pub struct HttpProbe {
    /// The HTTP client that the instance use for making the requests.
    http_cli: isahc::HttpClient,
}

impl HttpProbe {
    /// Creates a probe with its own HTTP client.
    pub fn new() -> Result<Self, Error> {
        let http_cli = isahc::HttpClientBuilder::new()
            .connection_cache_ttl(Duration::from_secs(5))
            .build()
            .map_err(|err| {
                Error::Common(ErrorCommon::internal(
                    "HTTP client initialization error",
                    BoxError::from(err),
                ))
            })?;

        Ok(Self { http_cli })
    }

    /// Sends a request to the endpoint and map errors and response HTTP status
    /// codes which aren't successful to errors.
    async fn send_request(
        &self,
        endpoint: &Endpoint,
    ) -> Result<isahc::Response<isahc::AsyncBody>, Error> {
        let ip_version = match endpoint.transport {
            Some(Family::V4) => IpVersion::V4,
            Some(Family::V6) => IpVersion::V6,
            None => IpVersion::Any,
        };

        let request = isahc::Request::get(endpoint.url.as_str())
            .timeout(endpoint.timeout)
            .ip_version(ip_version)
            .ssl_options(
                SslOption::DANGER_ACCEPT_INVALID_CERTS | SslOption::DANGER_ACCEPT_INVALID_HOSTS,
            )
            .body(())
            .map_err(|err| {
                Error::Common(ErrorCommon::invalid_arguments(
                    "endpoint{url}",
                    &err.to_string(),
                ))
            })?;

        let response = self
            .http_cli
            .send_async(request)
            .await
            .map_err(Error::from_isahc)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(Error::Provider(ExternalService::Internal {
                reason: format!(
                    r#"{} has responded with an HTTP "{}" status code (expected 200)"#,
                    endpoint.url, status,
                ),
            }));
        }

        if status != http::StatusCode::OK {
            return Err(Error::Provider(ExternalService::InvalidResponse {
                reason: format!(
                    r#"{} has responded with an HTTP "{}" status code (expected 200)"#,
                    endpoint.url, status,
                ),
            }));
        }

        Ok(response)
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, endpoint: &Endpoint) -> ProbeOutcome {
        debug!(url = %endpoint.url, transport = ?endpoint.transport, "probing endpoint");

        let mut response = self.send_request(endpoint).await?;
        let mut body = Vec::with_capacity(MAX_BODY_LEN as usize);
        response
            .body_mut()
            .take(MAX_BODY_LEN)
            .read_to_end(&mut body)
            .await
            .map_err(|err| {
                Error::Common(ErrorCommon::network(
                    BoxError::from(err),
                    NetworkSide::Server,
                    true,
                ))
            })?;

        let text = std::str::from_utf8(&body).map_err(|_| {
            Error::Provider(ExternalService::InvalidResponse {
                reason: format!("{} has responded with a body which isn't UTF-8", endpoint.url),
            })
        })?;

        Address::from_str(text).map_err(Error::from_parse)
    }
}
