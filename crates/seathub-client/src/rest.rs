//! REST operations and the RAII borrow handle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use urlencoding::encode;

use seathub_core::types::status::PoolStatus;

use crate::{ClientError, Result};

/// License handle with RAII semantics.
///
/// Call [`return_license`](LicenseHandle::return_license) when done; a
/// handle dropped without an explicit return logs a warning, since Drop
/// cannot run the async return itself.
#[derive(Debug)]
pub struct LicenseHandle {
    id: String,
    tool: String,
    user: String,
    client: Arc<reqwest::Client>,
    base_url: String,
    returned: bool,
}

impl LicenseHandle {
    /// The borrow id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The tool name.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// The holder identity.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Return the license to the pool.
    pub async fn return_license(mut self) -> Result<()> {
        #[derive(Serialize)]
        struct ReturnRequest {
            id: String,
        }

        let url = format!("{}/licenses/return", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ReturnRequest {
                id: self.id.clone(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::HttpError(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        self.returned = true;
        Ok(())
    }
}

impl Drop for LicenseHandle {
    fn drop(&mut self) {
        if !self.returned {
            tracing::warn!(
                borrow_id = %self.id,
                tool = %self.tool,
                "License handle dropped without explicit return"
            );
        }
    }
}

/// Main license client.
#[derive(Debug, Clone)]
pub struct LicenseClient {
    client: Arc<reqwest::Client>,
    base_url: String,
}

impl LicenseClient {
    /// Create a new license client.
    ///
    /// `base_url` is the server root, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(reqwest::Client::new()),
            base_url: base_url.into(),
        }
    }

    /// The configured server root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Borrow a license seat for a tool.
    ///
    /// Returns [`ClientError::NoLicensesAvailable`] when the pool is at
    /// capacity (HTTP 409) so callers can retry later.
    pub async fn borrow(
        &self,
        tool: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<LicenseHandle> {
        let tool = tool.into();
        let user = user.into();

        #[derive(Serialize)]
        struct BorrowRequest {
            tool: String,
            user: String,
        }

        #[derive(Deserialize)]
        struct BorrowResponse {
            id: String,
        }

        let url = format!("{}/licenses/borrow", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&BorrowRequest {
                tool: tool.clone(),
                user: user.clone(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 409 {
            return Err(ClientError::NoLicensesAvailable(tool));
        }
        if !status.is_success() {
            return Err(ClientError::HttpError(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let data: BorrowResponse = response.json().await?;

        Ok(LicenseHandle {
            id: data.id,
            tool,
            user,
            client: Arc::clone(&self.client),
            base_url: self.base_url.clone(),
            returned: false,
        })
    }

    /// Get status for a specific tool.
    pub async fn get_status(&self, tool: impl Into<String>) -> Result<PoolStatus> {
        let tool = tool.into();
        let url = format!("{}/licenses/{}/status", self.base_url, encode(&tool));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::HttpError(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        Ok(response.json().await?)
    }

    /// Get status for all tools.
    pub async fn get_all_statuses(&self) -> Result<Vec<PoolStatus>> {
        let url = format!("{}/licenses/status", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::HttpError(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = LicenseClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
