//! Parameter sets for each CMQ queue action.
//!
//! Every builder validates its inputs and returns an [`ApiRequest`] without
//! touching the network, so the async and blocking façades share them.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{CmqError, Result};
use crate::response::QueueMeta;

/// Hard protocol limit for batch send, receive and delete.
pub const MAX_BATCH_SIZE: usize = 16;

/// Transport timeout for receives without an explicit polling window.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Added to a long-poll window so the server answers before the client gives up.
pub const LONG_POLL_MARGIN: Duration = Duration::from_secs(5);

/// Queue names: a letter followed by up to 63 letters, digits, `-` or `_`.
static QUEUE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn queue_name_regex() -> &'static Regex {
    QUEUE_NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_-]{0,63}$").expect("Invalid QUEUE_NAME_REGEX pattern")
    })
}

fn require_queue_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CmqError::Validation(
            "Invalid parameter: queueName is empty".to_string(),
        ));
    }
    Ok(())
}

/// Naming rule for new queues. Existing queues are addressed by any non-empty name.
fn validate_new_queue_name(name: &str) -> Result<()> {
    require_queue_name(name)?;
    if !queue_name_regex().is_match(name) {
        return Err(CmqError::Validation(format!(
            "Invalid queueName '{}'. Expected a letter followed by up to 63 letters, digits, '-' or '_'",
            name
        )));
    }
    Ok(())
}

/// One API call: action name, action-specific parameters and an optional
/// transport timeout that replaces the client default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiRequest {
    pub action: &'static str,
    pub params: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    fn new(action: &'static str) -> Self {
        Self {
            action,
            params: BTreeMap::new(),
            timeout: None,
        }
    }

    fn for_queue(action: &'static str, queue_name: &str) -> Self {
        Self::new(action).param("queueName", queue_name)
    }

    fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Adds the positive-valued attributes; the rest keep server defaults.
    fn meta(mut self, meta: &QueueMeta) -> Self {
        let fields = [
            ("maxMsgHeapNum", meta.max_msg_heap_num),
            ("pollingWaitSeconds", meta.polling_wait_seconds),
            ("visibilityTimeout", meta.visibility_timeout),
            ("maxMsgSize", meta.max_msg_size),
            ("msgRetentionSeconds", meta.msg_retention_seconds),
            ("rewindSeconds", meta.rewind_seconds),
        ];
        for (key, value) in fields {
            if value > 0 {
                self.params.insert(key.to_string(), value.to_string());
            }
        }
        self
    }

    /// Adds `{prefix}.1`, `{prefix}.2`, ... in input order.
    fn indexed<S: AsRef<str>>(mut self, prefix: &str, values: &[S]) -> Self {
        for (i, value) in values.iter().enumerate() {
            self.params
                .insert(format!("{}.{}", prefix, i + 1), value.as_ref().to_string());
        }
        self
    }

    /// Long-poll convention shared by single and batch receive.
    fn polling(mut self, polling_wait_seconds: i64) -> Self {
        if polling_wait_seconds > 0 {
            self.params.insert(
                "pollingWaitSeconds".to_string(),
                polling_wait_seconds.to_string(),
            );
        }
        self.timeout = Some(receive_timeout(polling_wait_seconds));
        self
    }
}

/// Transport timeout for a receive with the given polling window.
pub fn receive_timeout(polling_wait_seconds: i64) -> Duration {
    if polling_wait_seconds > 0 {
        Duration::from_secs(polling_wait_seconds as u64).saturating_add(LONG_POLL_MARGIN)
    } else {
        DEFAULT_RECEIVE_TIMEOUT
    }
}

pub(crate) fn create_queue(name: &str, meta: &QueueMeta) -> Result<ApiRequest> {
    validate_new_queue_name(name)?;
    Ok(ApiRequest::for_queue("CreateQueue", name).meta(meta))
}

pub(crate) fn delete_queue(name: &str) -> Result<ApiRequest> {
    require_queue_name(name)?;
    Ok(ApiRequest::for_queue("DeleteQueue", name))
}

pub(crate) fn list_queue(search_word: &str, offset: i64, limit: i64) -> ApiRequest {
    let mut req = ApiRequest::new("ListQueue");
    if !search_word.is_empty() {
        req = req.param("searchWord", search_word);
    }
    if offset >= 0 {
        req = req.param("offset", offset);
    }
    if limit > 0 {
        req = req.param("limit", limit);
    }
    req
}

pub(crate) fn get_queue_attributes(name: &str) -> ApiRequest {
    ApiRequest::for_queue("GetQueueAttributes", name)
}

pub(crate) fn set_queue_attributes(name: &str, meta: &QueueMeta) -> ApiRequest {
    ApiRequest::for_queue("SetQueueAttributes", name).meta(meta)
}

pub(crate) fn send_message(name: &str, body: &str, delay_seconds: u32) -> ApiRequest {
    ApiRequest::for_queue("SendMessage", name)
        .param("msgBody", body)
        .param("delaySeconds", delay_seconds)
}

pub(crate) fn batch_send_message<S: AsRef<str>>(
    name: &str,
    bodies: &[S],
    delay_seconds: u32,
) -> Result<ApiRequest> {
    if bodies.is_empty() || bodies.len() > MAX_BATCH_SIZE {
        return Err(CmqError::Validation(format!(
            "message batch size must be 1-{}, got {}",
            MAX_BATCH_SIZE,
            bodies.len()
        )));
    }
    Ok(ApiRequest::for_queue("BatchSendMessage", name)
        .indexed("msgBody", bodies)
        .param("delaySeconds", delay_seconds))
}

pub(crate) fn receive_message(name: &str, polling_wait_seconds: i64) -> ApiRequest {
    ApiRequest::for_queue("ReceiveMessage", name).polling(polling_wait_seconds)
}

pub(crate) fn batch_receive_message(
    name: &str,
    num_of_msg: u32,
    polling_wait_seconds: i64,
) -> Result<ApiRequest> {
    if num_of_msg == 0 || num_of_msg as usize > MAX_BATCH_SIZE {
        return Err(CmqError::Validation(format!(
            "numOfMsg must be 1-{}, got {}",
            MAX_BATCH_SIZE, num_of_msg
        )));
    }
    Ok(ApiRequest::for_queue("BatchReceiveMessage", name)
        .param("numOfMsg", num_of_msg)
        .polling(polling_wait_seconds))
}

pub(crate) fn delete_message(name: &str, receipt_handle: &str) -> ApiRequest {
    ApiRequest::for_queue("DeleteMessage", name).param("receiptHandle", receipt_handle)
}

/// `None` for an empty list: nothing to acknowledge, so no call is made.
pub(crate) fn batch_delete_message<S: AsRef<str>>(
    name: &str,
    receipt_handles: &[S],
) -> Option<ApiRequest> {
    if receipt_handles.is_empty() {
        return None;
    }
    Some(ApiRequest::for_queue("BatchDeleteMessage", name).indexed("receiptHandle", receipt_handles))
}
