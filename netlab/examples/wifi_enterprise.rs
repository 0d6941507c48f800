/// Connect to a WPA-Enterprise (802.1X) WiFi network.
///
/// Corporate and university networks usually want an identity, a password
/// and the CA that signed the RADIUS server's certificate.
use netlab::{ConnectionSecret, EapConfig, WifiManager};

#[tokio::main]
async fn main() -> netlab::Result<()> {
    let wifi = WifiManager::new().await?;

    let eap = EapConfig::new(
        "user@company.com",
        std::env::var("WIFI_PASSWORD").unwrap_or_default(),
    )
    .with_ca_certificate("/etc/ssl/certs/company-ca.pem");

    println!("Connecting to enterprise WiFi network...");
    wifi.connect("CorpNetwork", ConnectionSecret::Enterprise(eap))
        .await?;

    println!("Successfully connected to enterprise WiFi!");

    Ok(())
}
