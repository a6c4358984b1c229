//! Compose surface plumbing: prefill payloads, outgoing messages, and
//! draft content.
//!
//! The prefill formats are part of the client contract and pinned by
//! tests; rendering concerns stay with the embedding frontend.

use chrono::{DateTime, Utc};
use tracing::warn;

use fieldpost_api::{
    Draft, DraftId, MessageDetail, SaveDraftRequest, SendRequest, TargetType, UserId,
};

use crate::error::{Error, Result};
use crate::event::MailEvent;
use crate::mailbox::Mailbox;
use crate::navigator::ActiveTab;

/// Recipient preselected for the compose surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Account id.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
}

/// Ephemeral payload that seeds the compose surface.
///
/// Never persisted; the bridge hands it over exactly once and a fresh
/// compose visit starts blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposePrefill {
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Addressing mode.
    pub target_type: TargetType,
    /// Addressing argument (user id, batch, company, or role label).
    pub target_value: String,
    /// Draft being resumed, if the prefill came from one.
    pub draft_id: Option<DraftId>,
    /// Recipient details for rendering, when known.
    pub recipient: Option<Recipient>,
}

impl ComposePrefill {
    /// Prefill for replying to `detail`: quoted body, `Re:` subject,
    /// the sender preselected as the individual target.
    ///
    /// The prefix is always prepended, so replying to a reply yields
    /// `Re: Re: ...`.
    #[must_use]
    pub fn reply(detail: &MessageDetail) -> Self {
        let summary = &detail.summary;
        Self {
            subject: format!("Re: {}", summary.subject),
            body: format!(
                "\n\nOn {}, {} wrote:\n> {}",
                format_timestamp(summary.timestamp),
                summary.sender_name,
                detail.body.replace('\n', "\n> "),
            ),
            target_type: TargetType::Individual,
            target_value: summary.sender_id.to_string(),
            draft_id: None,
            recipient: Some(Recipient {
                user_id: summary.sender_id.clone(),
                name: summary.sender_name.clone(),
            }),
        }
    }

    /// Prefill for forwarding `detail`: the original under a forwarded
    /// message header, `Fwd:` subject, no target picked yet.
    #[must_use]
    pub fn forward(detail: &MessageDetail) -> Self {
        let summary = &detail.summary;
        Self {
            subject: format!("Fwd: {}", summary.subject),
            body: format!(
                "\n\n---------- Forwarded message ----------\nFrom: {}\nDate: {}\nSubject: {}\n\n{}",
                summary.sender_name,
                format_timestamp(summary.timestamp),
                summary.subject,
                detail.body,
            ),
            target_type: TargetType::Individual,
            target_value: String::new(),
            draft_id: None,
            recipient: None,
        }
    }

    /// Prefill that resumes a stored draft, field for field.
    ///
    /// Carries the draft id so saving again updates the same draft
    /// instead of creating a sibling.
    #[must_use]
    pub fn from_draft(draft: &Draft) -> Self {
        Self {
            subject: draft.subject.clone(),
            body: draft.body.clone(),
            target_type: draft.target_type,
            target_value: draft.target_value.clone(),
            draft_id: Some(draft.id),
            recipient: None,
        }
    }
}

/// Addressing for an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendTarget {
    /// Explicit recipient list.
    Users(Vec<UserId>),
    /// Every member of a training batch.
    Batch(String),
    /// Every member of a company.
    Company(String),
    /// Every holder of a role.
    Role(String),
}

/// A message ready to hand to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Priority label (`normal` or `urgent`).
    pub priority: String,
    /// Who receives it.
    pub target: SendTarget,
}

impl OutgoingMail {
    /// Checks the message is sendable: a non-blank subject and body,
    /// and at least one recipient in the chosen targeting mode.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() || self.body.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        let has_recipient = match &self.target {
            SendTarget::Users(ids) => !ids.is_empty(),
            SendTarget::Batch(label) | SendTarget::Company(label) | SendTarget::Role(label) => {
                !label.trim().is_empty()
            }
        };
        if has_recipient {
            Ok(())
        } else {
            Err(Error::NoRecipient)
        }
    }

    pub(crate) fn to_request(&self) -> SendRequest {
        let mut request = SendRequest {
            subject: self.subject.clone(),
            body: self.body.clone(),
            priority: self.priority.clone(),
            ..SendRequest::default()
        };
        match &self.target {
            SendTarget::Users(ids) => request.recipient_ids = Some(ids.clone()),
            SendTarget::Batch(label) => request.target_batch = Some(label.clone()),
            SendTarget::Company(label) => request.target_company = Some(label.clone()),
            SendTarget::Role(label) => request.target_role = Some(label.clone()),
        }
        request
    }
}

/// Draft content to store server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftContent {
    /// Draft to update in place, if resuming one.
    pub id: Option<DraftId>,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Addressing mode.
    pub target_type: TargetType,
    /// Addressing argument.
    pub target_value: String,
    /// Explicit recipient ids.
    pub recipient_ids: Vec<UserId>,
}

impl DraftContent {
    pub(crate) fn to_request(&self) -> SaveDraftRequest {
        SaveDraftRequest {
            id: self.id,
            subject: self.subject.clone(),
            body: self.body.clone(),
            target_type: self.target_type,
            target_value: self.target_value.clone(),
            recipient_ids: self.recipient_ids.clone(),
        }
    }
}

/// Human-readable timestamp used in quoted and forwarded bodies.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y, %H:%M").to_string()
}

impl Mailbox {
    /// Stages a reply to `source` and switches to the compose tab.
    pub fn prefill_reply(&self, source: &MessageDetail) {
        self.stage_prefill(ComposePrefill::reply(source));
    }

    /// Stages a forward of `source` and switches to the compose tab.
    pub fn prefill_forward(&self, source: &MessageDetail) {
        self.stage_prefill(ComposePrefill::forward(source));
    }

    /// Resumes `draft` on the compose tab.
    pub fn prefill_from_draft(&self, draft: &Draft) {
        self.stage_prefill(ComposePrefill::from_draft(draft));
    }

    fn stage_prefill(&self, prefill: ComposePrefill) {
        {
            let mut state = self.shared.state.lock();
            if state.shut_down {
                return;
            }
            state.prefill = Some(prefill);
            state.nav.tab = ActiveTab::Compose;
        }
        self.emit(MailEvent::ViewChanged);
    }

    /// Hands over the staged prefill, leaving the slot empty.
    ///
    /// The compose surface calls this exactly once when it opens; a
    /// second call (or a plain compose visit) gets `None` and starts
    /// blank.
    pub fn take_prefill(&self) -> Option<ComposePrefill> {
        self.shared.state.lock().prefill.take()
    }

    /// Abandons the compose surface and returns to the inbox tab.
    ///
    /// Any staged prefill is dropped without being saved.
    pub fn discard_compose(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.shut_down {
                return;
            }
            state.prefill = None;
            state.nav.tab = ActiveTab::Inbox;
        }
        self.emit(MailEvent::ViewChanged);
    }

    /// Sends `mail` and, on success, returns to the inbox tab.
    ///
    /// Returns the number of recipients the service delivered to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMessage`] or [`Error::NoRecipient`] when
    /// validation fails before any call goes out, or the remote
    /// failure; on failure the compose surface stays up so nothing is
    /// lost.
    pub async fn send_message(&self, mail: &OutgoingMail) -> Result<u32> {
        self.guard_active()?;
        mail.validate()?;
        let delivered = self.shared.api.send(&mail.to_request()).await?;
        self.finish_compose().await;
        Ok(delivered)
    }

    /// Saves `draft`, creating it or updating in place when it carries
    /// an id, then returns to the inbox tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails; the compose surface
    /// stays up in that case.
    pub async fn save_draft(&self, draft: &DraftContent) -> Result<DraftId> {
        self.guard_active()?;
        let saved = self.shared.api.save_draft(&draft.to_request()).await?;
        self.finish_compose().await;
        Ok(saved.id)
    }

    async fn finish_compose(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.shut_down {
                return;
            }
            state.prefill = None;
            state.nav.tab = ActiveTab::Inbox;
        }
        self.emit(MailEvent::ViewChanged);
        if let Err(error) = self.load_first_page().await {
            warn!(%error, "inbox reload after compose failed");
        }
    }

    /// Fetches the draft list.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    pub async fn load_drafts(&self) -> Result<()> {
        self.guard_active()?;
        let drafts = self.shared.api.drafts().await?;
        {
            let mut state = self.shared.state.lock();
            if state.shut_down {
                return Err(Error::ShutDown);
            }
            state.drafts = drafts;
        }
        self.emit(MailEvent::DraftsChanged);
        Ok(())
    }

    /// Deletes a draft remotely, then drops it from the local list.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails; the local list is
    /// untouched in that case.
    pub async fn delete_draft(&self, id: DraftId) -> Result<()> {
        self.guard_active()?;
        self.shared.api.delete_draft(id).await?;
        {
            let mut state = self.shared.state.lock();
            state.drafts.retain(|draft| draft.id != id);
        }
        self.emit(MailEvent::DraftsChanged);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use fieldpost_api::{MessageId, MessageSummary};

    use super::*;

    fn detail(subject: &str, sender_id: &str, sender_name: &str, body: &str) -> MessageDetail {
        MessageDetail {
            summary: MessageSummary {
                id: MessageId(7),
                subject: subject.into(),
                sender_id: UserId::new(sender_id),
                sender_name: sender_name.into(),
                sender_role: "Agniveer".into(),
                timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
                is_read: true,
                is_starred: false,
                priority: "normal".into(),
            },
            body: body.into(),
        }
    }

    #[test]
    fn reply_targets_the_sender_individually() {
        let prefill =
            ComposePrefill::reply(&detail("Leave Request", "AG0099", "R. Kumar", "May I?"));
        assert_eq!(prefill.subject, "Re: Leave Request");
        assert_eq!(prefill.target_type, TargetType::Individual);
        assert_eq!(prefill.target_value, "AG0099");
        assert_eq!(
            prefill.recipient,
            Some(Recipient {
                user_id: UserId::new("AG0099"),
                name: "R. Kumar".into(),
            })
        );
    }

    #[test]
    fn reply_quotes_every_line_of_the_original() {
        let prefill = ComposePrefill::reply(&detail(
            "Leave Request",
            "AG0099",
            "R. Kumar",
            "First line\nSecond line",
        ));
        assert_eq!(
            prefill.body,
            "\n\nOn Mar 14, 2025, 09:30, R. Kumar wrote:\n> First line\n> Second line"
        );
    }

    #[test]
    fn reply_prefix_is_not_deduplicated() {
        let prefill = ComposePrefill::reply(&detail("Re: Leave Request", "AG0099", "R. Kumar", "x"));
        assert_eq!(prefill.subject, "Re: Re: Leave Request");
    }

    #[test]
    fn forward_carries_the_original_under_a_header() {
        let prefill = ComposePrefill::forward(&detail("Orders", "HQ01", "Adjutant", "Move out."));
        assert_eq!(prefill.subject, "Fwd: Orders");
        assert_eq!(
            prefill.body,
            "\n\n---------- Forwarded message ----------\nFrom: Adjutant\nDate: Mar 14, 2025, 09:30\nSubject: Orders\n\nMove out."
        );
        assert_eq!(prefill.target_value, "");
        assert!(prefill.recipient.is_none());
    }

    #[test]
    fn draft_prefill_is_verbatim_and_remembers_the_id() {
        let draft = Draft {
            id: DraftId(12),
            subject: "Weekly report".into(),
            body: "So far:".into(),
            target_type: TargetType::Batch,
            target_value: "2024-A".into(),
            updated_at: Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
            recipient_ids: vec![UserId::new("AG0099")],
        };
        let prefill = ComposePrefill::from_draft(&draft);
        assert_eq!(prefill.subject, "Weekly report");
        assert_eq!(prefill.body, "So far:");
        assert_eq!(prefill.target_type, TargetType::Batch);
        assert_eq!(prefill.target_value, "2024-A");
        assert_eq!(prefill.draft_id, Some(DraftId(12)));
    }

    #[test]
    fn outgoing_mail_rejects_blank_content() {
        let mail = OutgoingMail {
            subject: "  ".into(),
            body: "text".into(),
            priority: "normal".into(),
            target: SendTarget::Users(vec![UserId::new("AG0099")]),
        };
        assert!(matches!(mail.validate(), Err(Error::EmptyMessage)));
    }

    #[test]
    fn outgoing_mail_rejects_empty_targeting() {
        let mail = OutgoingMail {
            subject: "Orders".into(),
            body: "Move out.".into(),
            priority: "normal".into(),
            target: SendTarget::Users(Vec::new()),
        };
        assert!(matches!(mail.validate(), Err(Error::NoRecipient)));

        let mail = OutgoingMail {
            subject: "Orders".into(),
            body: "Move out.".into(),
            priority: "normal".into(),
            target: SendTarget::Batch("  ".into()),
        };
        assert!(matches!(mail.validate(), Err(Error::NoRecipient)));
    }

    #[test]
    fn send_request_uses_one_targeting_field() {
        let mail = OutgoingMail {
            subject: "Orders".into(),
            body: "Move out.".into(),
            priority: "urgent".into(),
            target: SendTarget::Company("Bravo".into()),
        };
        let request = mail.to_request();
        assert_eq!(request.target_company.as_deref(), Some("Bravo"));
        assert!(request.recipient_ids.is_none());
        assert!(request.target_batch.is_none());
        assert!(request.target_role.is_none());
    }
}
