//! Push notification transport.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{NotifyError, PushMessage};

/// Header carrying the destination channel token.
const CHANNEL_TOKEN_HEADER: &str = "x-channel-token";

/// API path for creating a message.
const MESSAGE_PATH: &str = "/api/v1/message";

/// Destination for push messages.
pub trait NotificationSink {
    /// Deliver `message` to the channel identified by `channel_token`.
    fn push(
        &self,
        base_path: &str,
        channel_token: &str,
        message: &PushMessage,
    ) -> Result<PushReceipt, NotifyError>;
}

/// API answer to a push request.
#[derive(Debug, Clone, Deserialize)]
pub struct PushReceipt {
    /// 0 on success
    pub code: i64,

    #[serde(default)]
    pub errmsg: Option<String>,

    #[serde(default)]
    pub data: Option<PushData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushData {
    pub message_id: i64,
}

impl PushReceipt {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    pub fn message_id(&self) -> Option<i64> {
        self.data.as_ref().map(|d| d.message_id)
    }
}

/// DaDaPush HTTP API client.
pub struct DaDaPushClient {
    http: Client,
}

impl DaDaPushClient {
    /// Create a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sonar-dadapush/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

impl NotificationSink for DaDaPushClient {
    fn push(
        &self,
        base_path: &str,
        channel_token: &str,
        message: &PushMessage,
    ) -> Result<PushReceipt, NotifyError> {
        let url = message_url(base_path);
        debug!(url = %url, title = %message.title, "Sending push request");

        let response = self
            .http
            .post(&url)
            .header(CHANNEL_TOKEN_HEADER, channel_token)
            .json(message)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        debug!(status = %status, body = %body, "Push response");

        serde_json::from_str(&body).map_err(NotifyError::from)
    }
}

fn message_url(base_path: &str) -> String {
    format!("{}{}", base_path.trim_end_matches('/'), MESSAGE_PATH)
}
