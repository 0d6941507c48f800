/// Custom deadlines for slow networks.
///
/// Enterprise authentication and some USB adapters take longer than the
/// defaults to come up.
use netlab::{ConnectionSecret, WifiConfig, WifiManager};
use std::time::Duration;

#[tokio::main]
async fn main() -> netlab::Result<()> {
    let config = WifiConfig::new()
        .with_connect_timeout(Duration::from_secs(90))
        .with_hotspot_timeout(Duration::from_secs(45))
        .with_scan_default(Duration::from_secs(20));

    let wifi = WifiManager::with_config(config).await?;

    println!("WifiManager configured with custom timeouts:");
    println!("  Connect timeout: {:?}", wifi.config().connect_timeout);
    println!("  Hotspot timeout: {:?}", wifi.config().hotspot_timeout);
    println!("  Default scan:    {:?}", wifi.config().scan_default);

    println!("\nConnecting to network...");
    wifi.connect(
        "MyNetwork",
        ConnectionSecret::Passphrase {
            psk: std::env::var("WIFI_PASSWORD").unwrap_or_else(|_| "password".to_string()),
        },
    )
    .await?;

    println!("Connected successfully!");

    Ok(())
}
