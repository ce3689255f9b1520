use std::sync::Arc;

use crate::action;
use crate::client::Client;
use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::Result;
use crate::queue::Queue;
use crate::response::{CreateQueueResponse, Empty, QueueList, QueueMeta};
use crate::sign::SignMethod;

/// Account-level operations: creating, deleting and listing queues.
///
/// Cloning is cheap; clones and every [`Queue`] handed out share one
/// [`Client`].
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
    ///
    /// Only positive attributes in `meta` are sent; the rest take server
    /// defaults.
    pub async fn create_queue(&self, queue_name: &str, meta: &QueueMeta) -> Result<String> {
        let request = action::create_queue(queue_name, meta)?;
        let (_, resp) = self.client.execute::<CreateQueueResponse>(request).await?;
        Ok(resp.queue_id)
    }

    /// Deletes a queue.
    pub async fn delete_queue(&self, queue_name: &str) -> Result<()> {
        let request = action::delete_queue(queue_name)?;
        self.client.execute::<Empty>(request).await?;
        Ok(())
    }

    /// Lists queues whose name contains `search_word` (empty for all).
    ///
    /// `offset` is sent only when non-negative and `limit` only when positive.
    pub async fn list_queue(&self, search_word: &str, offset: i64, limit: i64) -> Result<QueueList> {
        let request = action::list_queue(search_word, offset, limit);
        let (_, list) = self.client.execute(request).await?;
        Ok(list)
    }

    /// Returns a handle for `queue_name`. No request is made.
    pub fn queue(&self, queue_name: impl Into<String>) -> Queue {
        Queue::new(queue_name.into(), Arc::clone(&self.client))
    }
}
