//! HTTP client for the mail service REST surface.
//!
//! One thin method per endpoint; no retry or caching policy lives here.
//! The engine crate decides when to call and what to do with failures.

use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{
    BulkDeleteRequest, Draft, DraftId, Folder, FolderStats, MessageDetail, MessageId,
    MessageSummary, SaveDraftRequest, SavedDraft, SendRequest, StarState,
};

/// Client for the mail service REST API.
///
/// Holds a connection pool and the bearer credential of one user
/// session. Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct MailApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl MailApi {
    /// Creates a client for the service mounted at `base_url`.
    ///
    /// `base_url` should include the mount prefix (for example
    /// `https://host/api`); endpoint paths are joined below it.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Creates a client that reuses an existing connection pool.
    #[must_use]
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Unauthorized),
            status => Err(Error::Status {
                status: status.as_u16(),
            }),
        }
    }

    /// Fetches one page of a folder listing.
    ///
    /// `search` applies to the inbox only; other folders ignore it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn list(
        &self,
        folder: Folder,
        skip: usize,
        limit: usize,
        search: Option<&str>,
    ) -> Result<Vec<MessageSummary>> {
        debug!(folder = folder.as_str(), skip, limit, "fetching folder page");
        let mut request = self
            .http
            .get(self.url(&format!("/mail/{}", folder.as_str())))
            .bearer_auth(&self.token)
            .query(&[("skip", skip), ("limit", limit)]);
        if folder == Folder::Inbox
            && let Some(term) = search.filter(|term| !term.is_empty())
        {
            request = request.query(&[("search", term)]);
        }
        let response = Self::check(request.send().await?)?;
        Ok(response.json().await?)
    }

    /// Fetches the full content of an inbox or trash message.
    ///
    /// The service marks the entry read as a side effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn message(&self, id: MessageId) -> Result<MessageDetail> {
        let response = self
            .http
            .get(self.url(&format!("/mail/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Fetches the full content of a sent message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn sent_message(&self, id: MessageId) -> Result<MessageDetail> {
        let response = self
            .http
            .get(self.url(&format!("/mail/sent/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Fetches the per-folder counter snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn stats(&self) -> Result<FolderStats> {
        let response = self
            .http
            .get(self.url("/mail/stats"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Fetches the bare inbox unread count.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn unread_count(&self) -> Result<u32> {
        let response = self
            .http
            .get(self.url("/mail/unread-count"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Sends a message; answers with the fan-out recipient count.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it,
    /// including [`Error::Unauthorized`] for an expired credential.
    pub async fn send(&self, request: &SendRequest) -> Result<u32> {
        debug!(subject = %request.subject, "sending message");
        let response = self
            .http
            .post(self.url("/mail/send"))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Creates or updates a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn save_draft(&self, request: &SaveDraftRequest) -> Result<SavedDraft> {
        let response = self
            .http
            .post(self.url("/mail/drafts"))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Lists all of the user's drafts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn drafts(&self) -> Result<Vec<Draft>> {
        let response = self
            .http
            .get(self.url("/mail/drafts"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Deletes a stored draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn delete_draft(&self, id: DraftId) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/mail/drafts/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    /// Toggles the star flag; answers with the authoritative value.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn toggle_star(&self, id: MessageId) -> Result<StarState> {
        let response = self
            .http
            .post(self.url(&format!("/mail/{id}/star")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Soft-deletes a message (moves it to trash server-side).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn delete(&self, id: MessageId) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/mail/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    /// Permanently deletes a trashed message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn delete_forever(&self, id: MessageId) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/mail/trash/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    /// Moves a trashed message back to the inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn restore(&self, id: MessageId) -> Result<()> {
        let response = self
            .http
            .post(self.url(&format!("/mail/restore/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    /// Deletes a batch of messages from one folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub async fn bulk_delete(&self, request: &BulkDeleteRequest) -> Result<()> {
        debug!(
            count = request.ids.len(),
            folder = request.folder.as_str(),
            "bulk deleting messages"
        );
        let response = self
            .http
            .post(self.url("/mail/bulk-delete"))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }
}
