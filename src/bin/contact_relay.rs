use std::sync::Arc;

use beacon_network_client::contact::mailer::HttpMailer;
use beacon_network_client::contact::server::{ContactState, router};
use beacon_network_client::contact::settings::RelayConfig;

#[tokio::main]
async fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RelayConfig::from_env()?;
    log::info!(
        "Contact relay starting with {} recipient key(s)",
        config.recipients.len()
    );

    let state = Arc::new(ContactState {
        recipients: config.recipients,
        from: config.from,
        mailer: Arc::new(HttpMailer::new(&config.mail_api_url, &config.mail_api_key)),
    });

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {e}", config.addr))?;
    log::info!("Listening on {}", config.addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| format!("Server error: {e}"))
}
