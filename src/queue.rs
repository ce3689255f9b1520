use std::sync::Arc;

use crate::action;
use crate::client::Client;
use crate::error::Result;
use crate::response::{
    BatchReceiveMessageResponse, BatchSendMessageResponse, Empty, QueueMessage, QueueMeta,
    SendMessageResponse, SentMessage,
};

/// Message operations on one named queue.
///
/// Obtained from [`crate::Account::queue`].
#[derive(Clone)]
pub struct Queue {
    name: String,
    client: Arc<Client>,
}

impl Queue {
    pub(crate) fn new(name: String, client: Arc<Client>) -> Self {
        Self { name, client }
    }

    /// Name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetches the queue attributes and current message counts.
    pub async fn attributes(&self) -> Result<QueueMeta> {
        let request = action::get_queue_attributes(&self.name);
        let (_, meta) = self.client.execute(request).await?;
        Ok(meta)
    }

    /// Updates the positive-valued attributes in `meta`.
    pub async fn set_attributes(&self, meta: &QueueMeta) -> Result<()> {
        let request = action::set_queue_attributes(&self.name, meta);
        self.client.execute::<Empty>(request).await?;
        Ok(())
    }

    /// Sends one message, visible after `delay_seconds` (0 = immediately).
    ///
    /// Returns the server-assigned message id.
    pub async fn send_message(&self, body: &str, delay_seconds: u32) -> Result<String> {
        let request = action::send_message(&self.name, body, delay_seconds);
        let (_, resp) = self.client.execute::<SendMessageResponse>(request).await?;
        Ok(resp.msg_id)
    }

    /// Sends 1-16 messages in one call.
    ///
    /// The returned ids are in the same order as `bodies`.
    pub async fn batch_send_message<S: AsRef<str>>(
        &self,
        bodies: &[S],
        delay_seconds: u32,
    ) -> Result<Vec<String>> {
        let request = action::batch_send_message(&self.name, bodies, delay_seconds)?;
        let (_, resp) = self.client.execute::<BatchSendMessageResponse>(request).await?;
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
    ///
    /// With a non-positive wait the queue's own polling setting applies. An
    /// empty queue yields a server error for which
    /// [`crate::CmqError::is_no_message`] is `true`.
    pub async fn receive_message(&self, polling_wait_seconds: i64) -> Result<QueueMessage> {
        let request = action::receive_message(&self.name, polling_wait_seconds);
        let (_, msg) = self.client.execute(request).await?;
        Ok(msg)
    }

    /// Receives up to `num_of_msg` (1-16) messages.
    ///
    /// Each message carries the batch response's code, message and request id.
    pub async fn batch_receive_message(
        &self,
        num_of_msg: u32,
        polling_wait_seconds: i64,
    ) -> Result<Vec<QueueMessage>> {
        let request = action::batch_receive_message(&self.name, num_of_msg, polling_wait_seconds)?;
        let (envelope, resp) = self.client.execute::<BatchReceiveMessageResponse>(request).await?;
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
    pub async fn delete_message(&self, receipt_handle: &str) -> Result<()> {
        let request = action::delete_message(&self.name, receipt_handle);
        self.client.execute::<Empty>(request).await?;
        Ok(())
    }

    /// Acknowledges several deliveries. An empty slice makes no request.
    pub async fn batch_delete_message<S: AsRef<str>>(&self, receipt_handles: &[S]) -> Result<()> {
        let Some(request) = action::batch_delete_message(&self.name, receipt_handles) else {
            return Ok(());
        };
        self.client.execute::<Empty>(request).await?;
        Ok(())
    }
}
