//! client configuration
//!
//! build a [`ClientConfig`] with the appsync endpoint and api key, and
//! optional transport overrides. pass it to [`crate::Client::new`] to
//! create a client.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// configuration for the appsync client
#[derive(Clone)]
pub struct ClientConfig {
    /// original endpoint input
    pub(crate) raw_endpoint: String,

    /// appsync graphql endpoint
    /// (e.g., "<https://example.appsync-api.us-east-1.amazonaws.com/graphql>")
    pub(crate) endpoint: Url,

    /// whether the provided endpoint parsed successfully
    pub(crate) endpoint_valid: bool,

    /// api key sent as the `x-api-key` header
    pub(crate) api_key: String,

    /// request timeout duration
    pub(crate) timeout: Duration,

    /// user agent string
    pub(crate) user_agent: String,

    /// whether to verify ssl certificates
    pub(crate) verify_ssl: bool,

    /// additional headers to send with every request
    pub(crate) extra_headers: HeaderMap,

    /// prebuilt http client (takes precedence over http_client_builder)
    pub(crate) http_client: Option<reqwest::Client>,

    /// callback to customize the http client builder before building
    pub(crate) http_client_builder:
        Option<Arc<dyn Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync>>,
}

impl ClientConfig {
    /// create a new client configuration
    ///
    /// # arguments
    ///
    /// * `endpoint` - the appsync graphql endpoint; a missing `/graphql`
    ///   path segment is appended when requests are built
    /// * `api_key` - the api key for `x-api-key` authentication
    ///
    /// # example
    ///
    /// ```
    /// use appsync::ClientConfig;
    ///
    /// let config = ClientConfig::new(
    ///     "https://example.appsync-api.us-east-1.amazonaws.com/graphql",
    ///     "da2-example",
    /// );
    /// ```
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        let endpoint_str = endpoint.as_ref();

        let normalized = endpoint_str.trim_end_matches('/');

        let (endpoint, endpoint_valid) = match Url::parse(normalized)
            .or_else(|_| Url::parse(&format!("https://{}", normalized)))
        {
            Ok(url) => (url, true),
            Err(_) => (Url::parse("https://invalid.invalid").unwrap(), false),
        };

        Self {
            raw_endpoint: endpoint_str.to_string(),
            endpoint,
            endpoint_valid,
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("appsync-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            extra_headers: HeaderMap::new(),
            http_client: None,
            http_client_builder: None,
        }
    }

    /// set the request timeout
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to every request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// access extra headers configured on this client
    pub fn extra_headers(&self) -> &HeaderMap {
        &self.extra_headers
    }

    /// inject a prebuilt http client.
    ///
    /// when set, this client is used as-is and takes precedence over
    /// `with_http_client_builder`. all transport configuration — auth
    /// headers, tls, timeouts, ssl verification, user agent — comes from
    /// the prebuilt client; the corresponding `ClientConfig` fields are
    /// ignored.
    ///
    /// because auth is managed by the caller, an empty api key is
    /// accepted when this option is set.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// customize the http client builder before the client is created.
    ///
    /// the callback receives a builder that already has the auth header,
    /// extra headers, user agent, timeout, and ssl settings applied.
    /// use this to add proxy config, custom tls roots, or other
    /// transport settings without reimplementing the defaults.
    ///
    /// ignored if `with_http_client` is also set.
    pub fn with_http_client_builder<F>(mut self, f: F) -> Self
    where
        F: Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync + 'static,
    {
        self.http_client_builder = Some(Arc::new(f));
        self
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.endpoint_valid {
            return Err(Error::Config(format!(
                "invalid endpoint url: {}",
                self.raw_endpoint
            )));
        }

        if self.endpoint.scheme() != "http" && self.endpoint.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                self.endpoint.scheme()
            )));
        }

        // an api key is only required when the client manages its own transport
        if self.http_client.is_none() && self.api_key.is_empty() {
            return Err(Error::Config("api key cannot be empty".to_string()));
        }

        Ok(())
    }

    /// build the graphql url, appending `/graphql` if the endpoint does
    /// not already carry it
    pub(crate) fn graphql_url(&self) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let url_str = if base.ends_with("/graphql") {
            base.to_string()
        } else {
            format!("{}/graphql", base)
        };
        Url::parse(&url_str).map_err(Error::from)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("extra_headers", &self.extra_headers.len())
            .field("http_client", &self.http_client.is_some())
            .field("http_client_builder", &self.http_client_builder.is_some())
            .field("api_key", &"<redacted>")
            .finish()
    }
}
