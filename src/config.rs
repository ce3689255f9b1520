use std::time::Duration;

use crate::sign::SignMethod;

/// HTTP verb used to deliver the signed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    /// Parameters are sent as a form-encoded body.
    #[default]
    Post,
    /// Parameters are appended to the query string.
    Get,
}

impl HttpMethod {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Get => "GET",
        }
    }
}

/// Configuration for the CMQ client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host of the CMQ queue endpoint.
    pub endpoint: String,

    /// Request path appended to the endpoint.
    pub path: String,

    /// HTTP verb for every call.
    pub method: HttpMethod,

    /// Initial signing method; can be switched later on the client.
    pub sign_method: SignMethod,

    /// Default HTTP request timeout. Long-poll receives override it per call.
    pub timeout: Duration,

    /// TCP connect timeout.
    pub connect_timeout: Duration,

    /// Skip TLS certificate validation. Off unless explicitly enabled.
    pub danger_accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://cmq-queue-bj.api.tencentyun.com".to_string(),
            path: "/v2/index.php".to_string(),
            method: HttpMethod::Post,
            sign_method: SignMethod::HmacSha1,
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            danger_accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Sets a custom endpoint, e.g. `https://cmq-queue-gz.api.qcloud.com`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the HTTP verb.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the signing method.
    pub fn with_sign_method(mut self, sign_method: SignMethod) -> Self {
        self.sign_method = sign_method;
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Disables TLS certificate validation.
    ///
    /// Only meant for test environments behind self-signed proxies.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Full request URL (`endpoint` + `path`).
    pub(crate) fn url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), self.path)
    }

    /// Endpoint host as it appears in the string to sign (no scheme).
    pub(crate) fn host(&self) -> &str {
        let endpoint = self.endpoint.trim_end_matches('/');
        endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"))
            .unwrap_or(endpoint)
    }
}
