use std::time::Duration;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::StatusCode;
use crate::approval::{ApprovalError, ApprovalRequest, ApprovalService};
use crate::config::PrivatesConfig;

/// Approval over HTTP: the request is POSTed as JSON and a `200`/`201` answer approves it.
pub struct HttpApprovalService {
    client: reqwest::Client,
    url: url::Url,
    game_id: u32,
    collection_id: u32,
}

impl HttpApprovalService {
    pub fn new(url: url::Url, connect_timeout: Duration, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url, game_id: 1, collection_id: 1 })
    }

    pub fn from_config(config: &PrivatesConfig) -> Result<Self, reqwest::Error> {
        let mut svc = Self::new(
            config.approval_url.clone(),
            config.approval_connect_timeout,
            config.approval_timeout,
        )?;
        svc.game_id = config.game_id;
        svc.collection_id = config.collection_id;
        Ok(svc)
    }

    async fn send(&self, request: &ApprovalRequest) -> Result<(), ApprovalError> {
        let request = request.clone().with_collection(self.game_id, self.collection_id);
        log::debug!("Sending approval request for zone '{}' to {}", request.metadata.name, self.url);

        let res = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| ApprovalError::Unavailable(format!("Network error: {e}")))?;

        let status = res.status();
        // Body is only informative; an unreadable one must not turn a rejection into an outage.
        let body = res.text().await.unwrap_or_default();
        log::debug!("Approval service answered {} for zone '{}': {}", status, request.metadata.name, body);

        if is_approval(status) {
            Ok(())
        } else if body.is_empty() {
            Err(ApprovalError::Rejected(format!("API returned status: {}", status.as_u16())))
        } else {
            Err(ApprovalError::Rejected(format!("API returned status: {} ({})", status.as_u16(), body)))
        }
    }
}

impl ApprovalService for HttpApprovalService {
    fn approve<'a>(&'a self, request: &'a ApprovalRequest) -> BoxFuture<'a, Result<(), ApprovalError>> {
        self.send(request).boxed()
    }
}

fn is_approval(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}
