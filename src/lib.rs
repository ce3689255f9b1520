//! Tencent Cloud CMQ (Cloud Message Queue) SDK for Rust.
//!
//! This crate provides both async and sync (blocking) clients for the CMQ
//! queue API:
//!
//! - [`Account::create_queue`], [`Account::delete_queue`], [`Account::list_queue`]
//! - [`Queue::attributes`] / [`Queue::set_attributes`]
//! - [`Queue::send_message`] / [`Queue::batch_send_message`]
//! - [`Queue::receive_message`] / [`Queue::batch_receive_message`] (long polling)
//! - [`Queue::delete_message`] / [`Queue::batch_delete_message`]
//!
//! Every request carries `Action`, `SecretId`, `Timestamp`, `Nonce` and a
//! `Signature` (HMAC-SHA1 by default, HMAC-SHA256 on request). Responses are
//! checked for a zero `code` before anything else is trusted; a non-zero code
//! surfaces as [`CmqError::Server`].
//!
//! # Quick Start (async)
//!
//! ```no_run
//! use tencent_cmq::{Account, Credential, QueueMeta};
//!
//! # async fn example() -> tencent_cmq::Result<()> {
//! let account = Account::new(Credential::new("your-secret-id", "your-secret-key"))?;
//!
//! account.create_queue("orders", &QueueMeta::default()).await?;
//!
//! let queue = account.queue("orders");
//! let msg_id = queue.send_message("hello", 0).await?;
//! println!("sent {}", msg_id);
//!
//! match queue.receive_message(10).await {
//!     Ok(msg) => queue.delete_message(&msg.receipt_handle).await?,
//!     Err(e) if e.is_no_message() => println!("queue is empty"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod queue;
pub mod response;

#[cfg(feature = "blocking")]
pub mod blocking;

mod action;
mod exec;
mod request;
mod sign;

pub use account::Account;
pub use action::{DEFAULT_RECEIVE_TIMEOUT, LONG_POLL_MARGIN, MAX_BATCH_SIZE, receive_timeout};
pub use client::Client;
pub use config::{ClientConfig, HttpMethod};
pub use credential::Credential;
pub use error::{CmqError, NO_MESSAGE_CODE, Result};
pub use queue::Queue;
pub use response::{Envelope, QueueList, QueueMessage, QueueMeta, QueueSummary};
pub use sign::SignMethod;

// Compile-time assertions: key types must be Send + Sync for use across threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Client>;
    let _ = assert_send_sync::<Account>;
    let _ = assert_send_sync::<Queue>;
    let _ = assert_send_sync::<CmqError>;
    let _ = assert_send_sync::<Credential>;
};
