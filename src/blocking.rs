//! Synchronous (blocking) client for the CMQ API.
//!
//! This module is only available when the `blocking` feature is enabled.
//! It mirrors [`crate::Client`], [`crate::Account`] and [`crate::Queue`]
//! using `reqwest::blocking`, and shares their parameter building, signing
//! and response decoding.
//!
//! # Example
//!
//! ```no_run
//! use tencent_cmq::blocking::Account;
//! use tencent_cmq::{Credential, QueueMeta};
//!
//! fn main() -> tencent_cmq::Result<()> {
//!     let account = Account::new(Credential::new("AKID...", "secret"))?;
//!     account.create_queue("orders", &QueueMeta::default())?;
//!
//!     let queue = account.queue("orders");
//!     queue.send_message("hello", 0)?;
//!     let msg = queue.receive_message(10)?;
//!     queue.delete_message(&msg.receipt_handle)?;
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::action::{self, ApiRequest};
use crate::config::{ClientConfig, HttpMethod};
use crate::credential::Credential;
use crate::error::{CmqError, Result};
use crate::exec::{calculate_smoothed_offset, decode, extract_server_time, handle_response};
use crate::request::{build_signed_params, encode_params};
use crate::response::{
    BatchReceiveMessageResponse, BatchSendMessageResponse, CreateQueueResponse, Empty, Envelope,
    QueueList, QueueMessage, QueueMeta, SendMessageResponse, SentMessage,
};
use crate::sign::SignMethod;

/// Synchronous transport and signing layer for the CMQ API.
pub struct Client {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    credential: Credential,
    sign_method: AtomicU8,
    /// Clock skew offset in seconds (server_time - local_time).
    time_offset: AtomicI64,
}

impl Client {
    /// Creates a new blocking client with an explicit credential.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Creates a new blocking client with custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
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

    /// Creates a new blocking client with credentials from the environment.
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
    pub fn time_offset(&self) -> i64 {
        self.time_offset.load(Ordering::Relaxed)
    }

    /// Calls `action` with `params` and returns the raw response body.
    pub fn call(&self, action: &str, params: BTreeMap<String, String>) -> Result<String> {
        self.dispatch(action, params, None)
    }

    fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<(Envelope, T)> {
        let text = self.dispatch(request.action, request.params, request.timeout)?;
        decode(request.action, &text)
    }

    /// Updates the clock offset from a server timestamp (75% old + 25% new).
    fn update_time_offset(&self, server_time: i64) {
        let local_time = chrono::Utc::now().timestamp();
        let current_offset = self.time_offset.load(Ordering::Relaxed);
        let smoothed = calculate_smoothed_offset(current_offset, server_time - local_time);
        self.time_offset.store(smoothed, Ordering::Relaxed);
    }

    fn dispatch(
        &self,
        action: &str,
        params: BTreeMap<String, String>,
        timeout: Option<Duration>,
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

        let response = builder.send()?;

        // Try to extract server time from response headers for clock skew correction
        if let Some(server_time) = extract_server_time(response.headers()) {
            self.update_time_offset(server_time);
        }

        let status = response.status();
        let text = response.text()?;

        handle_response(status, text)
    }
}

/// Blocking counterpart of [`crate::Account`].
#[derive(Clone)]
pub struct Account {
    client: Arc<Client>,
}

impl Account {
    /// Creates an account against the default Beijing endpoint.
    pub fn new(credential: Credential) -> Result<Self> {
        Ok(Self::from_client(Arc::new(Client::new(credential)?)))
    }

    /// Creates an account with custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        Ok(Self::from_client(Arc::new(Client::with_config(
            credential, config,
        )?)))
    }

    /// Creates an account with credentials from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_client(Arc::new(Client::from_env()?)))
    }

    /// Wraps an existing client.
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    /// Switches the signing method for this account and all its queues.
    pub fn set_sign_method(&self, method: SignMethod) {
        self.client.set_sign_method(method);
    }

    /// Creates a queue and returns its server-assigned id.
    pub fn create_queue(&self, queue_name: &str, meta: &QueueMeta) -> Result<String> {
        let request = action::create_queue(queue_name, meta)?;
        let (_, resp) = self.client.execute::<CreateQueueResponse>(request)?;
        Ok(resp.queue_id)
    }

    /// Deletes a queue.
    pub fn delete_queue(&self, queue_name: &str) -> Result<()> {
        let request = action::delete_queue(queue_name)?;
        self.client.execute::<Empty>(request)?;
        Ok(())
    }

    /// Lists queues whose name contains `search_word` (empty for all).
    pub fn list_queue(&self, search_word: &str, offset: i64, limit: i64) -> Result<QueueList> {
        let request = action::list_queue(search_word, offset, limit);
        let (_, list) = self.client.execute::<QueueList>(request)?;
        Ok(list)
    }

    /// Returns a handle for `queue_name`. No request is made.
    pub fn queue(&self, queue_name: impl Into<String>) -> Queue {
        Queue {
            name: queue_name.into(),
            client: Arc::clone(&self.client),
        }
    }
}

/// Blocking counterpart of [`crate::Queue`].
#[derive(Clone)]
pub struct Queue {
    name: String,
    client: Arc<Client>,
}

impl Queue {
    /// Name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetches the queue attributes and current message counts.
    pub fn attributes(&self) -> Result<QueueMeta> {
        let request = action::get_queue_attributes(&self.name);
        let (_, meta) = self.client.execute::<QueueMeta>(request)?;
        Ok(meta)
    }

    /// Updates the positive-valued attributes in `meta`.
    pub fn set_attributes(&self, meta: &QueueMeta) -> Result<()> {
        let request = action::set_queue_attributes(&self.name, meta);
        self.client.execute::<Empty>(request)?;
        Ok(())
    }

    /// Sends one message and returns its id.
    pub fn send_message(&self, body: &str, delay_seconds: u32) -> Result<String> {
        let request = action::send_message(&self.name, body, delay_seconds);
        let (_, resp) = self.client.execute::<SendMessageResponse>(request)?;
        Ok(resp.msg_id)
    }

    /// Sends 1-16 messages; ids come back in submission order.
    pub fn batch_send_message<S: AsRef<str>>(
        &self,
        bodies: &[S],
        delay_seconds: u32,
    ) -> Result<Vec<String>> {
        let request = action::batch_send_message(&self.name, bodies, delay_seconds)?;
        let (_, resp) = self.client.execute::<BatchSendMessageResponse>(request)?;
        let ids: Vec<String> = resp
            .msg_list
            .into_iter()
            .map(SentMessage::into_msg_id)
            .collect();
        if ids.len() != bodies.len() {
            tracing::warn!(
                queue = %self.name,
                sent = bodies.len(),
                returned = ids.len(),
                "BatchSendMessage returned a different number of ids"
            );
        }
        Ok(ids)
    }

    /// Receives one message, long-polling for up to `polling_wait_seconds`.
    pub fn receive_message(&self, polling_wait_seconds: i64) -> Result<QueueMessage> {
        let request = action::receive_message(&self.name, polling_wait_seconds);
        let (_, msg) = self.client.execute::<QueueMessage>(request)?;
        Ok(msg)
    }

    /// Receives up to `num_of_msg` (1-16) messages.
    pub fn batch_receive_message(
        &self,
        num_of_msg: u32,
        polling_wait_seconds: i64,
    ) -> Result<Vec<QueueMessage>> {
        let request = action::batch_receive_message(&self.name, num_of_msg, polling_wait_seconds)?;
        let (envelope, resp) = self.client.execute::<BatchReceiveMessageResponse>(request)?;
        Ok(resp
            .msg_info_list
            .into_iter()
            .map(|mut msg| {
                msg.inherit(&envelope);
                msg
            })
            .collect())
    }

    /// Acknowledges one delivery.
    pub fn delete_message(&self, receipt_handle: &str) -> Result<()> {
        let request = action::delete_message(&self.name, receipt_handle);
        self.client.execute::<Empty>(request)?;
        Ok(())
    }

    /// Acknowledges several deliveries. An empty slice makes no request.
    pub fn batch_delete_message<S: AsRef<str>>(&self, receipt_handles: &[S]) -> Result<()> {
        let Some(request) = action::batch_delete_message(&self.name, receipt_handles) else {
            return Ok(());
        };
        self.client.execute::<Empty>(request)?;
        Ok(())
    }
}
