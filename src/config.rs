use std::env;

/// Runtime configuration, resolved once at process start. The store URL and
/// token used to live as literals inside the signup function; everything is
/// environment-supplied now with no change to the request flow.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub kv_rest_url: String,
    pub kv_rest_token: String,
    pub notify_webhook_url: Option<String>,
    pub key_prefix: String,
    pub reward_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let kv_rest_url = env::var("KV_REST_URL").map_err(|_| "KV_REST_URL must be set")?;
        let kv_rest_token = env::var("KV_REST_TOKEN").map_err(|_| "KV_REST_TOKEN must be set")?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let notify_webhook_url = env::var("NOTIFY_WEBHOOK_URL").ok();
        let key_prefix = env::var("SIGNUP_KEY_PREFIX").unwrap_or_else(|_| "signup".to_string());

        let reward_limit = match env::var("REWARD_LIMIT") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|_| format!("REWARD_LIMIT must be an integer, got {:?}", raw))?,
            Err(_) => 20,
        };

        Ok(Self {
            bind_addr,
            kv_rest_url,
            kv_rest_token,
            notify_webhook_url,
            key_prefix,
            reward_limit,
        })
    }
}
