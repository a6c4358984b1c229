//! # fieldpost-core
//!
//! Per-user mail engine for Fieldpost clients.
//!
//! This crate provides:
//! - Folder listings with paginated pull and debounced inbox search
//! - A live push channel with heartbeats and a polling fallback
//! - Optimistic mutations (star, read-on-open, delete, restore, bulk
//!   delete) with explicit revert on failure
//! - A write-once/read-once compose bridge for reply, forward, and
//!   draft resume
//! - Tab and folder navigation state
//!
//! Everything hangs off [`Mailbox`]: construct one per signed-in
//! [`Session`], subscribe to [`MailEvent`] notices, and call
//! [`Mailbox::shutdown`] on logout.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod confirm;
mod error;
pub mod event;
mod mailbox;
mod mutate;
pub mod navigator;
mod pull;
mod push;
pub mod session;
pub mod store;

pub use compose::{ComposePrefill, DraftContent, OutgoingMail, Recipient, SendTarget};
pub use config::MailboxConfig;
pub use confirm::{AutoConfirm, ConfirmAction, ConfirmPolicy};
pub use error::{Error, Result};
pub use event::MailEvent;
pub use mailbox::Mailbox;
pub use navigator::{ActiveTab, FolderNavigator};
pub use push::PushMode;
pub use session::Session;
pub use store::{MessageStore, RemovedRows};

pub use fieldpost_api as api;
pub use fieldpost_api::{
    Draft, DraftId, Folder, FolderStats, MessageDetail, MessageId, MessageSummary, PushEvent,
    TargetType, UserId,
};
