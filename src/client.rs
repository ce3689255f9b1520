use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};

use serde::de::DeserializeOwned;

use crate::action::ApiRequest;
use crate::config::{ClientConfig, HttpMethod};
use crate::credential::Credential;
use crate::error::{CmqError, Result};
use crate::exec::{calculate_smoothed_offset, decode, extract_server_time, handle_response};
use crate::request::{build_signed_params, encode_params};
use crate::response::Envelope;
use crate::sign::SignMethod;

/// Async transport and signing layer for the CMQ API.
///
/// `Client` knows nothing about individual actions: it adds the common
/// parameters, signs, sends and hands back the raw body. The typed
/// operations live on [`crate::Account`] and [`crate::Queue`].
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    credential: Credential,
    sign_method: AtomicU8,
    /// Clock skew offset in seconds (server_time - local_time).
    time_offset: AtomicI64,
}

impl Client {
    /// Creates a new client with an explicit credential.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Creates a new client with an explicit credential and custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if config.danger_accept_invalid_certs {
            tracing::warn!(
                endpoint = %config.endpoint,
                "TLS certificate validation is disabled"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| CmqError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            sign_method: AtomicU8::new(config.sign_method.to_u8()),
            config,
            credential,
            time_offset: AtomicI64::new(0),
        })
    }

    /// Creates a new client with credentials from `TENCENTCLOUD_SECRET_ID` and
    /// `TENCENTCLOUD_SECRET_KEY`.
    pub fn from_env() -> Result<Self> {
        let credential = Credential::from_env()?;
        Self::new(credential)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the signing method used for subsequent calls.
    pub fn sign_method(&self) -> SignMethod {
        SignMethod::from_u8(self.sign_method.load(Ordering::Relaxed))
    }

    /// Switches the signing method for subsequent calls.
    pub fn set_sign_method(&self, method: SignMethod) {
        self.sign_method.store(method.to_u8(), Ordering::Relaxed);
    }

    /// Returns the current clock offset in seconds.
    ///
    /// A positive value means the local clock is behind the server clock.
    pub fn time_offset(&self) -> i64 {
        self.time_offset.load(Ordering::Relaxed)
    }

    /// Calls `action` with `params` and returns the raw response body.
    ///
    /// The body is returned as-is; a non-zero `code` inside it is not an
    /// error at this level.
    pub async fn call(&self, action: &str, params: BTreeMap<String, String>) -> Result<String> {
        self.dispatch(action, params, None).await
    }

    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<(Envelope, T)> {
        let text = self
            .dispatch(request.action, request.params, request.timeout)
            .await?;
        decode(request.action, &text)
    }

    fn update_time_offset(&self, server_time: i64) {
        let local_time = chrono::Utc::now().timestamp();
        let current_offset = self.time_offset.load(Ordering::Relaxed);
        let smoothed = calculate_smoothed_offset(current_offset, server_time - local_time);
        self.time_offset.store(smoothed, Ordering::Relaxed);
    }

    async fn dispatch(
        &self,
        action: &str,
        params: BTreeMap<String, String>,
        timeout: Option<std::time::Duration>,
    ) -> Result<String> {
        let params = build_signed_params(
            action,
            params,
            &self.credential,
            &self.config,
            self.sign_method(),
            self.time_offset(),
        )?;
        let encoded = encode_params(&params);
        let url = self.config.url();

        tracing::debug!(
            action,
            method = self.config.method.as_str(),
            %url,
            "sending CMQ request"
        );

        let mut builder = match self.config.method {
            HttpMethod::Post => self
                .http
                .post(&url)
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(encoded),
            HttpMethod::Get => self.http.get(format!("{}?{}", url, encoded)),
        };
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;

        if let Some(server_time) = extract_server_time(response.headers()) {
            self.update_time_offset(server_time);
        }

        let status = response.status();
        let text = response.text().await?;

        handle_response(status, text)
    }
}
