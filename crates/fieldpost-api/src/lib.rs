//! # fieldpost-api
//!
//! Wire layer for the Fieldpost mail service: the JSON data model, a
//! typed REST client, and the per-user push channel socket.
//!
//! This crate provides:
//! - Serde models for folder listings, message details, drafts, and stats
//! - [`MailApi`], one method per REST endpoint, bearer-authenticated
//! - [`PushSocket`], the event channel with heartbeat support
//!
//! Policy (pagination, debouncing, optimistic mutation, fallbacks)
//! lives in `fieldpost-core`; this crate only moves bytes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod client;
mod error;
pub mod push;
pub mod types;

pub use client::MailApi;
pub use error::{Error, Result};
pub use push::PushSocket;
pub use types::{
    BulkDeleteRequest, Draft, DraftId, Folder, FolderStats, MessageDetail, MessageId,
    MessageSummary, PushEvent, SaveDraftRequest, SavedDraft, SendRequest, StarState, TargetType,
    UserId,
};
