use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields common to every CMQ response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// 0 on success, server-defined error code otherwise.
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: String,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Queue attributes.
///
/// Used both as input to `CreateQueue`/`SetQueueAttributes` (only positive
/// values are sent, anything else leaves the server default) and as the
/// decoded `GetQueueAttributes` result. Fields absent from a response keep the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueMeta {
    /// Maximum number of heaped messages; -1 leaves the server default.
    pub max_msg_heap_num: i64,
    /// Default long-poll wait for receives, 0-30 seconds.
    pub polling_wait_seconds: i64,
    /// Seconds a received message stays invisible, 1-43200.
    pub visibility_timeout: i64,
    /// Maximum body size in bytes, 1024-65536.
    pub max_msg_size: i64,
    /// Seconds a message is kept, 60-1296000.
    pub msg_retention_seconds: i64,
    /// Rewind window in seconds, 0 disables rewinding.
    pub rewind_seconds: i64,

    pub create_time: i64,
    pub last_modify_time: i64,
    pub active_msg_num: i64,
    pub inactive_msg_num: i64,
    pub rewind_msg_num: i64,
    pub min_msg_time: i64,
    pub delay_msg_num: i64,
}

impl QueueMeta {
    pub const DEFAULT_MAX_MSG_HEAP_NUM: i64 = -1;
    pub const DEFAULT_POLLING_WAIT_SECONDS: i64 = 0;
    pub const DEFAULT_VISIBILITY_TIMEOUT: i64 = 30;
    pub const DEFAULT_MAX_MSG_SIZE: i64 = 65536;
    pub const DEFAULT_MSG_RETENTION_SECONDS: i64 = 345600;
    pub const DEFAULT_REWIND_SECONDS: i64 = 0;
}

impl Default for QueueMeta {
    fn default() -> Self {
        Self {
            max_msg_heap_num: Self::DEFAULT_MAX_MSG_HEAP_NUM,
            polling_wait_seconds: Self::DEFAULT_POLLING_WAIT_SECONDS,
            visibility_timeout: Self::DEFAULT_VISIBILITY_TIMEOUT,
            max_msg_size: Self::DEFAULT_MAX_MSG_SIZE,
            msg_retention_seconds: Self::DEFAULT_MSG_RETENTION_SECONDS,
            rewind_seconds: Self::DEFAULT_REWIND_SECONDS,
            create_time: 0,
            last_modify_time: 0,
            active_msg_num: 0,
            inactive_msg_num: 0,
            rewind_msg_num: 0,
            min_msg_time: 0,
            delay_msg_num: 0,
        }
    }
}

/// One message delivered by `ReceiveMessage`/`BatchReceiveMessage`.
///
/// `receipt_handle` identifies this particular delivery and changes every
/// time the message is dequeued; `msg_id` is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: String,

    pub msg_id: String,
    pub receipt_handle: String,
    pub msg_body: String,
    #[serde(default)]
    pub enqueue_time: i64,
    #[serde(default)]
    pub next_visible_time: i64,
    #[serde(default)]
    pub first_dequeue_time: i64,
    #[serde(default)]
    pub dequeue_count: i64,
}

impl QueueMessage {
    /// When the message entered the queue.
    pub fn enqueued_at(&self) -> Option<DateTime<Utc>> {
        epoch_seconds(self.enqueue_time)
    }

    /// When the message becomes visible again unless deleted first.
    pub fn next_visible_at(&self) -> Option<DateTime<Utc>> {
        epoch_seconds(self.next_visible_time)
    }

    /// When the message was first received.
    pub fn first_dequeued_at(&self) -> Option<DateTime<Utc>> {
        epoch_seconds(self.first_dequeue_time)
    }

    pub(crate) fn inherit(&mut self, envelope: &Envelope) {
        self.code = envelope.code;
        self.message.clone_from(&envelope.message);
        self.request_id.clone_from(&envelope.request_id);
    }
}

fn epoch_seconds(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

/// Queue entry returned by `ListQueue`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
    pub queue_id: String,
    pub queue_name: String,
}

/// One page of `ListQueue` results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueList {
    /// Number of queues matching the filter across all pages.
    pub total_count: i64,
    #[serde(rename = "queueList", default)]
    pub queues: Vec<QueueSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateQueueResponse {
    #[serde(default)]
    pub queue_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessageResponse {
    pub msg_id: String,
}

/// `msgList` entries come either as bare ids or as `{"msgId": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SentMessage {
    Id(String),
    #[serde(rename_all = "camelCase")]
    Entry { msg_id: String },
}

impl SentMessage {
    pub fn into_msg_id(self) -> String {
        match self {
            SentMessage::Id(id) | SentMessage::Entry { msg_id: id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchSendMessageResponse {
    #[serde(default)]
    pub msg_list: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchReceiveMessageResponse {
    #[serde(default)]
    pub msg_info_list: Vec<QueueMessage>,
}

/// Response with nothing beyond the envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Empty {}
