use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body of a Discord "execute webhook" call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookPayload {
    pub content: String,
    pub allowed_mentions: AllowedMentions,
}

/// Which mention kinds in `content` actually notify.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
}

impl WebhookPayload {
    /// A message whose role and user mentions both ping.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            allowed_mentions: AllowedMentions {
                parse: vec!["roles".to_string(), "users".to_string()],
            },
        }
    }
}

/// Status and body of a webhook POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status, or 0 when the request never got a response.
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Posts JSON to a URL. Failures are returned as a reply, never as an error.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post_json(&self, url: &str, payload: &WebhookPayload) -> HttpReply;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, payload: &WebhookPayload) -> HttpReply {
        // The URL embeds the webhook token: keep it out of logs.
        debug!(bytes = payload.content.len(), "posting webhook message");

        let resp = match self.client.post(url).json(payload).send().await {
            Ok(resp) => resp,
            Err(e) => {
                return HttpReply {
                    status: 0,
                    body: e.without_url().to_string(),
                }
            }
        };

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        HttpReply { status, body }
    }
}
