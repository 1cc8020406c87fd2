use dotenvy::dotenv;
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use signup_backend::services::form::SignupForm;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv().ok();

    let email = env::args()
        .nth(1)
        .ok_or("Usage: submit_signup <email>")?;

    let webhook_url = env::var("FORM_WEBHOOK_URL").expect("FORM_WEBHOOK_URL must be set");
    let storage_url = env::var("FORM_STORAGE_URL").ok();
    let timeout_secs = env::var("FORM_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(30);

    let form = SignupForm::new(storage_url, webhook_url, timeout_secs)?;

    match form.submit(&email).await {
        Ok(eligible) => {
            println!("You're signed up!");
            if eligible == Some(true) {
                println!("You're among the first signups - launch rewards unlocked.");
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }

    Ok(())
}
