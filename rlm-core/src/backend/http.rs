//! REST Backend
//!
//! `RetentionBackend` over the evidence-management JSON API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::traits::RetentionBackend;
use crate::audit::AuditRecord;
use crate::config::ManagerConfig;
use crate::error::{RetentionError, RetentionResult};
use crate::notify::Notification;
use crate::types::{
    ArchiveRequest, DeletionCheck, EvidenceRecord, HoldApplication, HoldRemoval, LegalHold,
    ModificationCheck, ReleaseRequest, RetentionAssignment, RetentionPolicy,
};

/// Longest error body echoed into an error message
const MAX_ERROR_BODY: usize = 256;

/// HTTP client for the backend API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    /// HTTP client
    client: Client,
    /// Base URL
    base_url: Url,
    /// Request timeout
    timeout: Duration,
}

impl HttpBackend {
    /// Create a new client
    pub fn new(base_url: &str, timeout: Duration) -> RetentionResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RetentionError::config(format!("invalid API URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RetentionError::config(format!(
                "API URL cannot be used as a base: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RetentionError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Create from manager configuration
    pub fn from_config(config: &ManagerConfig) -> RetentionResult<Self> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> RetentionResult<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RetentionError::persistence(
                    operation,
                    format!("request timed out after {:?}", self.timeout),
                )
            } else {
                RetentionError::persistence(operation, e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        debug!(operation = operation, status = status.as_u16(), "Backend rejected request");

        Err(RetentionError::persistence(
            operation,
            format!("HTTP {}: {}", status.as_u16(), body),
        ))
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &str, url: Url) -> RetentionResult<T> {
        let response = self.send(operation, self.client.get(url)).await?;
        response.json::<T>().await.map_err(|e| {
            RetentionError::persistence(operation, format!("invalid response body: {}", e))
        })
    }
}

#[async_trait]
impl RetentionBackend for HttpBackend {
    async fn list_policies(&self) -> RetentionResult<Vec<RetentionPolicy>> {
        let url = self.endpoint(&["api", "retention-policies"]);
        self.get_json("load retention policies", url).await
    }

    async fn create_policy(&self, policy: &RetentionPolicy) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "retention-policies"]);
        self.send("create retention policy", self.client.post(url).json(policy))
            .await?;
        Ok(())
    }

    async fn update_policy(&self, policy: &RetentionPolicy) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "retention-policies", &policy.id]);
        self.send("update retention policy", self.client.put(url).json(policy))
            .await?;
        Ok(())
    }

    async fn delete_policy(&self, policy_id: &str) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "retention-policies", policy_id]);
        self.send("delete retention policy", self.client.delete(url))
            .await?;
        Ok(())
    }

    async fn evidence_by_policy(&self, policy_id: &str) -> RetentionResult<Vec<EvidenceRecord>> {
        let url = self.endpoint(&["api", "evidence", "by-retention-policy", policy_id]);
        self.get_json("get evidence by retention policy", url).await
    }

    async fn apply_retention_policy(
        &self,
        assignment: &RetentionAssignment,
    ) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "evidence", "apply-retention-policy"]);
        self.send("apply retention policy", self.client.post(url).json(assignment))
            .await?;
        Ok(())
    }

    async fn expiring_evidence(&self, days_ahead: u32) -> RetentionResult<Vec<EvidenceRecord>> {
        let mut url = self.endpoint(&["api", "evidence", "expiring"]);
        url.query_pairs_mut()
            .append_pair("days", &days_ahead.to_string());
        self.get_json("get expiring evidence", url).await
    }

    async fn archive_evidence(&self, request: &ArchiveRequest) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "evidence", "archive"]);
        self.send("archive evidence", self.client.post(url).json(request))
            .await?;
        Ok(())
    }

    async fn list_holds(&self) -> RetentionResult<Vec<LegalHold>> {
        let url = self.endpoint(&["api", "legal-holds"]);
        self.get_json("load legal holds", url).await
    }

    async fn create_hold(&self, hold: &LegalHold) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "legal-holds"]);
        self.send("create legal hold", self.client.post(url).json(hold))
            .await?;
        Ok(())
    }

    async fn update_hold(&self, hold: &LegalHold) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "legal-holds", &hold.id]);
        self.send("update legal hold", self.client.put(url).json(hold))
            .await?;
        Ok(())
    }

    async fn release_hold(&self, hold_id: &str, request: &ReleaseRequest) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "legal-holds", hold_id, "release"]);
        self.send("release legal hold", self.client.post(url).json(request))
            .await?;
        Ok(())
    }

    async fn apply_legal_hold(&self, application: &HoldApplication) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "evidence", "apply-legal-hold"]);
        self.send(
            "apply legal hold to evidence",
            self.client.post(url).json(application),
        )
        .await?;
        Ok(())
    }

    async fn remove_legal_hold(&self, removal: &HoldRemoval) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "evidence", "remove-legal-hold"]);
        self.send(
            "remove legal hold from evidence",
            self.client.post(url).json(removal),
        )
        .await?;
        Ok(())
    }

    async fn deletion_check(&self, evidence_id: &str) -> RetentionResult<DeletionCheck> {
        let url = self.endpoint(&["api", "evidence", evidence_id, "deletion-check"]);
        self.get_json("validate evidence deletion", url).await
    }

    async fn modification_check(&self, evidence_id: &str) -> RetentionResult<ModificationCheck> {
        let url = self.endpoint(&["api", "evidence", evidence_id, "modification-check"]);
        self.get_json("validate evidence modification", url).await
    }

    async fn create_notifications(&self, notifications: &[Notification]) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "notifications", "bulk-create"]);
        let body = serde_json::json!({ "notifications": notifications });
        self.send("send notifications", self.client.post(url).json(&body))
            .await?;
        Ok(())
    }

    async fn log_admin_action(&self, record: &AuditRecord) -> RetentionResult<()> {
        let url = self.endpoint(&["api", "admin-actions", "log"]);
        self.send("log admin action", self.client.post(url).json(record))
            .await?;
        Ok(())
    }
}
