use reqwest::{Client, Url};
use serde::Deserialize;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Client for the key-value store's REST protocol: one path per command,
/// bearer-token authenticated, responses wrapped in a `{ "result": ... }`
/// envelope.
#[derive(Clone)]
pub struct KvStore {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ResultEnvelope<T> {
    result: T,
}

impl KvStore {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Build a command URL with each segment percent-encoded. Keys embed
    /// caller-supplied emails, which may contain `#`, `?`, or `/`; raw
    /// interpolation would truncate or split the key.
    fn command_url(&self, segments: &[&str]) -> Result<Url, BoxError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| "KV store URL cannot be a base")?
            .extend(segments);
        Ok(url)
    }

    /// Fetch a key's value; `None` when the key is absent.
    pub async fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        let url = self.command_url(&["get", key])?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("KV store error {}: {}", status, error_text).into());
        }

        let data: ResultEnvelope<Option<String>> = response.json().await?;
        Ok(data.result)
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), BoxError> {
        let url = self.command_url(&["set", key, value])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("KV store error {}: {}", status, error_text).into());
        }

        Ok(())
    }

    /// Atomically increment a key and return the new value. An absent key
    /// counts as 0 before the increment.
    pub async fn incr(&self, key: &str) -> Result<i64, BoxError> {
        let url = self.command_url(&["incr", key])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("KV store error {}: {}", status, error_text).into());
        }

        let data: ResultEnvelope<i64> = response.json().await?;
        Ok(data.result)
    }

    /// Set a key only if it does not already exist. Returns true iff the key
    /// was newly created; the whole check-and-create is a single store
    /// operation.
    pub async fn set_nx(&self, key: &str, value: &str) -> Result<bool, BoxError> {
        let url = self.command_url(&["setnx", key, value])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("KV store error {}: {}", status, error_text).into());
        }

        let data: ResultEnvelope<i64> = response.json().await?;
        Ok(data.result == 1)
    }
}
