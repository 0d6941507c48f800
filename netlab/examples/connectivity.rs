/// Checks internet reachability through NetworkManager.
///
/// NetworkManager must have connectivity checking enabled; otherwise the
/// state stays `unknown`.
use netlab::WifiManager;
use std::time::Duration;

#[tokio::main]
async fn main() -> netlab::Result<()> {
    let wifi = WifiManager::new().await?;

    let state = wifi.check_connectivity(Duration::from_secs(3)).await?;
    println!("Connectivity: {state}");

    if state.is_online() {
        println!("Internet is reachable");
    } else {
        println!("No internet access");
    }

    Ok(())
}
