//! Request/response sync with the marker server.
//!
//! Both directions are single best-effort requests: no retries, no
//! backoff. Failures surface as [`SyncError`] for the UI to show and
//! leave local state unchanged.

use bridge::{Marker, MarkerDraft};

/// Upload/download failure, rendered to the user as a one-shot notice.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Network failure, or a response body that did not decode.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned HTTP {0}")]
    Status(u16),
}

/// HTTP client for the marker endpoint.
pub struct SyncClient {
    http: reqwest::Client,
    base_url: String,
}

impl SyncClient {
    /// Create a client for `{base_url}/api/markers`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// POST the full current marker list.
    ///
    /// # Errors
    ///
    /// [`SyncError::Http`] on network failure, [`SyncError::Status`]
    /// on a non-2xx response.
    pub async fn upload(&self, markers: &[Marker]) -> Result<(), SyncError> {
        let response = self
            .http
            .post(format!("{}/api/markers", self.base_url))
            .json(&markers)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        Ok(())
    }

    /// GET the server's full marker list. Callers treat the result as
    /// an import: overwrite local state, forward to the surface.
    ///
    /// # Errors
    ///
    /// [`SyncError::Http`] on network failure or a body that is not a
    /// marker array, [`SyncError::Status`] on a non-2xx response.
    pub async fn download(&self) -> Result<Vec<MarkerDraft>, SyncError> {
        let response = self
            .http
            .get(format!("{}/api/markers", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}
