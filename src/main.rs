use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use signup_backend::config::Config;
use signup_backend::services::{kv_store::KvStore, notifier::Notifier, signup::SignupService};
use signup_backend::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,signup_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().expect("Invalid configuration");

    let store = KvStore::new(config.kv_rest_url.clone(), config.kv_rest_token.clone());
    let signup = SignupService::new(store, config.key_prefix.clone(), config.reward_limit);
    let notifier = Notifier::new(config.notify_webhook_url.clone());

    if config.notify_webhook_url.is_none() {
        tracing::info!("NOTIFY_WEBHOOK_URL not set, notification forwarding disabled");
    }

    let state = AppState { signup, notifier };

    let app = signup_backend::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
