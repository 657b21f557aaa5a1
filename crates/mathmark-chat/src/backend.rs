use crate::error::ChatError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response to `POST /send_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_msg_id: Option<String>,
}

impl SendReceipt {
    pub fn processing(user_msg_id: impl Into<String>) -> Self {
        Self {
            status: "processing".to_string(),
            user_msg_id: Some(user_msg_id.into()),
        }
    }

    /// The backend accepted the message and replies should be polled.
    pub fn is_processing(&self) -> bool {
        self.status == "processing"
    }
}

/// Response to `GET /get_replies`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBatch {
    #[serde(default)]
    pub replies: Vec<Message>,
    /// No more replies will follow for the current exchange.
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Informational note such as "Timeout" or "No pending work".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The server half of the chat.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Submits a user message; replies are produced asynchronously.
    async fn send_message(&self, text: &str) -> Result<SendReceipt, ChatError>;

    /// Fetches whatever replies are ready.
    async fn get_replies(&self) -> Result<ReplyBatch, ChatError>;
}

/// [`ChatBackend`] over the widget's JSON endpoints.
///
/// The backend keys conversations on a session cookie, so the client keeps
/// a cookie store.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(&self, text: &str) -> Result<SendReceipt, ChatError> {
        let response = self
            .client
            .post(self.url("send_message"))
            .json(&serde_json::json!({ "message": text }))
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    async fn get_replies(&self) -> Result<ReplyBatch, ChatError> {
        let response = self.client.get(self.url("get_replies")).send().await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ChatError::Status(status.as_u16()))
    }
}
