use netlab::{ScanRequest, WifiManager};
use std::time::Duration;

#[tokio::main]
async fn main() -> netlab::Result<()> {
    let wifi = WifiManager::new().await?;

    println!("Scanning for WiFi networks...");
    let request = ScanRequest::all().with_max_duration(Duration::from_secs(15));

    for ap in wifi.scan(request).await? {
        println!(
            "{:32} {:17} {:>4} dBm  ch {:<3} {:9} {}",
            ap.ssid,
            ap.bssid,
            ap.rssi,
            ap.channel,
            ap.signal_rating.to_string(),
            ap.security
        );
    }

    Ok(())
}
