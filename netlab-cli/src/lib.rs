pub mod file_lock;

use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use netlab::{
    AccessPoint, ConnectionSecret, EapConfig, HotspotRequest, ScanRequest, WifiConfig, WifiManager,
};

use crate::file_lock::acquire_app_lock;

#[derive(Parser, Debug)]
#[command(name = "netlab")]
#[command(version, about = "Scan, join and host Wi-Fi networks through NetworkManager")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub timeouts: Timeouts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default)]
pub struct Timeouts {
    /// Seconds to wait for a client connection to activate
    #[arg(long, global = true, env = "NETLAB_CONNECT_TIMEOUT")]
    pub connect_timeout: Option<u64>,

    /// Seconds to wait for a hotspot to activate
    #[arg(long, global = true, env = "NETLAB_HOTSPOT_TIMEOUT")]
    pub hotspot_timeout: Option<u64>,
}

impl Timeouts {
    fn apply(&self, mut config: WifiConfig) -> WifiConfig {
        if let Some(secs) = self.connect_timeout {
            config = config.with_connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.hotspot_timeout {
            config = config.with_hotspot_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List nearby access points, strongest first
    Scan {
        /// Only scan this interface
        #[arg(short, long)]
        interface: Option<String>,

        /// Scan duration in seconds; 0 uses the default
        #[arg(short, long, default_value_t = 0)]
        duration: u64,
    },
    /// Join a Wi-Fi network
    Connect(ConnectArgs),
    /// Manage the access-point hotspot
    #[command(subcommand)]
    Hotspot(HotspotCommand),
    /// Ask NetworkManager whether the internet is reachable
    Connectivity {
        /// Milliseconds to wait for the check; 0 uses the default
        #[arg(short, long, default_value_t = 0)]
        timeout_ms: u64,
    },
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Network name
    pub ssid: String,

    /// WPA passphrase
    #[arg(long, env = "NETLAB_PSK", conflicts_with_all = ["open", "eap_identity"])]
    pub psk: Option<String>,

    /// Join without encryption
    #[arg(long, conflicts_with = "eap_identity")]
    pub open: bool,

    /// 802.1X identity for enterprise networks
    #[arg(long, requires = "eap_password")]
    pub eap_identity: Option<String>,

    /// 802.1X password
    #[arg(long, env = "NETLAB_EAP_PASSWORD")]
    pub eap_password: Option<String>,

    /// Client certificate path
    #[arg(long, requires = "eap_identity")]
    pub client_cert: Option<String>,

    /// CA certificate path
    #[arg(long, requires = "eap_identity")]
    pub ca_cert: Option<String>,
}

impl ConnectArgs {
    fn secret(&self) -> anyhow::Result<ConnectionSecret> {
        if let Some(psk) = &self.psk {
            return Ok(ConnectionSecret::Passphrase { psk: psk.clone() });
        }
        if let Some(identity) = &self.eap_identity {
            let mut eap = EapConfig::new(
                identity.clone(),
                self.eap_password.clone().unwrap_or_default(),
            );
            if let Some(cert) = &self.client_cert {
                eap = eap.with_client_certificate(cert.clone());
            }
            if let Some(cert) = &self.ca_cert {
                eap = eap.with_ca_certificate(cert.clone());
            }
            return Ok(ConnectionSecret::Enterprise(eap));
        }
        if self.open {
            return Ok(ConnectionSecret::Open { confirmed: true });
        }
        bail!("pass --psk, --eap-identity or --open")
    }
}

#[derive(Subcommand, Debug)]
pub enum HotspotCommand {
    /// Start broadcasting a WPA2 hotspot
    Start {
        #[arg(long, env = "NETLAB_HOTSPOT_SSID")]
        ssid: String,

        #[arg(long, env = "NETLAB_HOTSPOT_PASS")]
        pass: String,

        #[arg(short, long, env = "NETLAB_HOTSPOT_INTERFACE")]
        interface: Option<String>,
    },
    /// Stop the hotspot broadcasting SSID
    Stop {
        ssid: String,

        /// Also delete the saved profile
        #[arg(long)]
        delete: bool,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.timeouts.apply(WifiConfig::default());
    let wifi = WifiManager::with_config(config)
        .await
        .context("failed to reach NetworkManager on the system bus")?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    match cli.command {
        Commands::Scan {
            interface,
            duration,
        } => {
            let mut request = ScanRequest::all().with_max_duration(Duration::from_secs(duration));
            if let Some(iface) = interface {
                request = request.on_interface(iface);
            }
            let networks = wifi.scan_with_cancel(request, &cancel).await?;
            print_networks(&networks);
        }
        Commands::Connect(args) => {
            let secret = args.secret()?;
            let _lock = acquire_app_lock()?;
            wifi.connect_with_cancel(&args.ssid, secret, &cancel)
                .await
                .with_context(|| format!("failed to connect to '{}'", args.ssid))?;
            info!("connected to '{}'", args.ssid);
        }
        Commands::Hotspot(HotspotCommand::Start {
            ssid,
            pass,
            interface,
        }) => {
            let mut request = HotspotRequest::new(ssid.clone(), pass);
            if let Some(iface) = interface {
                request = request.on_interface(iface);
            }
            let _lock = acquire_app_lock()?;
            wifi.start_hotspot_with_cancel(request, &cancel)
                .await
                .with_context(|| format!("failed to start hotspot '{ssid}'"))?;
            info!("hotspot '{ssid}' is up");
        }
        Commands::Hotspot(HotspotCommand::Stop { ssid, delete }) => {
            let _lock = acquire_app_lock()?;
            wifi.stop_hotspot(&ssid, delete)
                .await
                .with_context(|| format!("failed to stop hotspot '{ssid}'"))?;
            info!("hotspot '{ssid}' stopped");
        }
        Commands::Connectivity { timeout_ms } => {
            let state = wifi
                .check_connectivity(Duration::from_millis(timeout_ms))
                .await?;
            println!("connectivity: {state}");
            if !state.is_online() {
                bail!("no internet access ({state})");
            }
        }
    }

    Ok(())
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupted, cancelling");
                cancel.cancel();
            }
            Err(e) => warn!("cannot listen for Ctrl-C: {e}"),
        }
    });
}

fn print_networks(networks: &[AccessPoint]) {
    if networks.is_empty() {
        println!("no networks found");
        return;
    }
    println!(
        "{:<32} {:<17} {:>5} {:>4} {:<10} {}",
        "SSID", "BSSID", "RSSI", "CH", "SIGNAL", "SECURITY"
    );
    for ap in networks {
        let ssid = if ap.is_hidden() {
            "<hidden>"
        } else {
            ap.ssid.as_str()
        };
        println!(
            "{:<32} {:<17} {:>5} {:>4} {:<10} {}",
            ssid,
            ap.bssid,
            ap.rssi,
            ap.channel,
            ap.signal_rating.to_string(),
            ap.security
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn psk_becomes_passphrase_secret() {
        let cli = Cli::try_parse_from(["netlab", "connect", "Home", "--psk", "hunter22"]).unwrap();
        let Commands::Connect(args) = cli.command else {
            panic!("expected connect");
        };
        assert!(matches!(
            args.secret().unwrap(),
            ConnectionSecret::Passphrase { psk } if psk == "hunter22"
        ));
    }

    #[test]
    fn enterprise_flags_build_eap_secret() {
        let cli = Cli::try_parse_from([
            "netlab",
            "connect",
            "Corp",
            "--eap-identity",
            "alice",
            "--eap-password",
            "pw",
            "--ca-cert",
            "/etc/ca.pem",
        ])
        .unwrap();
        let Commands::Connect(args) = cli.command else {
            panic!("expected connect");
        };
        let ConnectionSecret::Enterprise(eap) = args.secret().unwrap() else {
            panic!("expected enterprise secret");
        };
        assert_eq!(eap.identity, "alice");
        assert_eq!(eap.ca_certificate.as_deref(), Some("/etc/ca.pem"));
    }

    #[test]
    fn connect_without_secret_is_rejected() {
        let cli = Cli::try_parse_from(["netlab", "connect", "Cafe"]).unwrap();
        let Commands::Connect(args) = cli.command else {
            panic!("expected connect");
        };
        assert!(args.secret().is_err());
    }

    #[test]
    fn timeout_overrides_apply() {
        let timeouts = Timeouts {
            connect_timeout: Some(5),
            hotspot_timeout: None,
        };
        let config = timeouts.apply(WifiConfig::default());
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.hotspot_timeout, WifiConfig::default().hotspot_timeout);
    }

    #[test]
    fn connectivity_timeout_defaults_to_zero() {
        let cli = Cli::try_parse_from(["netlab", "connectivity"]).unwrap();
        assert!(matches!(cli.command, Commands::Connectivity { timeout_ms: 0 }));

        let cli = Cli::try_parse_from(["netlab", "connectivity", "-t", "1500"]).unwrap();
        assert!(matches!(cli.command, Commands::Connectivity { timeout_ms: 1500 }));
    }

    #[test]
    fn hotspot_stop_parses_delete_flag() {
        let cli = Cli::try_parse_from(["netlab", "hotspot", "stop", "Lab", "--delete"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Hotspot(HotspotCommand::Stop { ref ssid, delete: true }) if ssid == "Lab"
        ));
    }
}
