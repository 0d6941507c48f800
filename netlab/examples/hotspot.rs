/// Bring up a hotspot, keep it running until Ctrl-C, then tear it down.
///
/// Ctrl-C during activation cancels the wait and deactivates the
/// half-started hotspot.
use netlab::{HotspotRequest, WifiManager};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> netlab::Result<()> {
    let wifi = WifiManager::new().await?;

    let ssid = std::env::var("HOTSPOT_SSID").unwrap_or_else(|_| "netlab-demo".to_string());
    let pass = std::env::var("HOTSPOT_PASS").unwrap_or_else(|_| "correct horse".to_string());
    let mut request = HotspotRequest::new(ssid.clone(), pass);
    if let Ok(iface) = std::env::var("HOTSPOT_INTERFACE") {
        request = request.on_interface(iface);
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        on_ctrl_c.cancel();
    });

    println!("Starting hotspot '{ssid}'...");
    wifi.start_hotspot_with_cancel(request, &cancel).await?;
    println!("Hotspot is up. Press Ctrl-C to stop.");

    cancel.cancelled().await;
    wifi.stop_hotspot(&ssid, true).await?;
    println!("Hotspot stopped.");

    Ok(())
}
