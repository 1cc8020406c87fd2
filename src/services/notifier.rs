use reqwest::Client;
use serde_json::json;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Best-effort forwarder for the notification webhook. Runs off the request
/// path so collaborator latency never shows up in response time; failures are
/// logged and swallowed.
#[derive(Clone)]
pub struct Notifier {
    client: Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    /// Fire-and-forget: spawns the forward and returns immediately.
    pub fn notify(&self, email: &str) {
        let Some(url) = self.webhook_url.clone() else {
            return;
        };
        let client = self.client.clone();
        let email = email.to_string();

        tokio::spawn(async move {
            if let Err(err) = forward(&client, &url, &email).await {
                tracing::warn!("Notification webhook failed: {}", err);
            }
        });
    }
}

async fn forward(client: &Client, url: &str, email: &str) -> Result<(), BoxError> {
    let response = client
        .post(url)
        .json(&json!({ "email": email }))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(format!("webhook returned {}", response.status()).into());
    }

    Ok(())
}
