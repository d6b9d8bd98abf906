mod scenarios;

use std::path::PathBuf;

use beacon_network_client::LogLevel;
use beacon_network_client::beacon::client::BeaconClient;
use beacon_network_client::config::{Settings, default_config_path};

#[tokio::main]
async fn main() -> Result<(), String> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(default_config_path)
        .ok_or("No config path given and no config directory found")?;
    let settings = Settings::load(&path)?;

    let client = BeaconClient::new(&settings.api_url, LogLevel::Information);

    scenarios::network::run(&client, &settings).await?;
    scenarios::search::run(&client, &settings).await?;

    Ok(())
}
