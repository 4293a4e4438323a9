use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use librenms_core::{ClientConfig, LibreNmsClient, DEFAULT_SNMP_VERSION};
use tracing_subscriber::EnvFilter;

/// librenms - register devices with a LibreNMS instance
///
/// The API URL and token may also be supplied through LIBRENMS_URL and
/// LIBRENMS_TOKEN.
///
/// Examples:
///   librenms exists 10.0.0.1
///   librenms add 10.0.0.1 --community public --snmp-version 2
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the LibreNMS instance, without /api/v0
    #[arg(long, env = "LIBRENMS_URL", value_name = "URL", global = true)]
    url: Option<String>,

    /// API token sent as X-Auth-Token
    #[arg(long, env = "LIBRENMS_TOKEN", value_name = "TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Check whether a device is registered
    Exists(ExistsArgs),

    /// Register a device for SNMP polling
    Add(AddArgs),
}

#[derive(clap::Args, Debug)]
struct ExistsArgs {
    /// IP address or DNS name of the device
    hostname: String,
}

#[derive(clap::Args, Debug)]
struct AddArgs {
    /// IP address or DNS name of the device
    hostname: String,

    /// SNMP community string
    #[arg(long, short = 'c')]
    community: String,

    /// SNMP version: 1, 2, 3, v1, v2c or v3
    #[arg(long, default_value = DEFAULT_SNMP_VERSION.as_str())]
    snmp_version: String,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let url = self.url.as_deref().context("missing --url (or LIBRENMS_URL)")?;
        let token = self.token.as_deref().context("missing --token (or LIBRENMS_TOKEN)")?;
        let mut config = ClientConfig::new(url, token).with_tls_verify(!self.insecure);
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.client_config()?;
    tracing::debug!(?config, "client configured");
    let client = LibreNmsClient::from_config(config);

    match cli.command {
        Commands::Exists(args) => {
            let exists = client
                .device_exists(&args.hostname)
                .with_context(|| format!("failed to look up {}", args.hostname))?;
            println!("{exists}");
        }
        Commands::Add(args) => {
            let response = client
                .add_device_with_version(&args.hostname, &args.community, &args.snmp_version)
                .with_context(|| format!("failed to add {}", args.hostname))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_exists_parsing() {
        let cli = Cli::try_parse_from(["librenms", "--url", "http://nms", "--token", "t", "exists", "host1"]).unwrap();
        match cli.command {
            Commands::Exists(args) => assert_eq!(args.hostname, "host1"),
            _ => panic!("Expected Exists command"),
        }
        assert!(!cli.insecure);
    }

    #[test]
    fn test_cli_add_defaults_to_v2c() {
        let cli = Cli::try_parse_from(["librenms", "add", "host3", "--community", "public"]).unwrap();
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.hostname, "host3");
                assert_eq!(args.community, "public");
                assert_eq!(args.snmp_version, "v2c");
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "librenms", "add", "h", "-c", "x", "--snmp-version", "1", "--insecure", "--timeout", "5",
        ])
        .unwrap();
        assert!(cli.insecure);
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn test_cli_add_requires_community() {
        assert!(Cli::try_parse_from(["librenms", "add", "host3"]).is_err());
    }

    #[test]
    fn test_client_config_from_flags() {
        let cli = Cli::try_parse_from([
            "librenms", "--url", "https://nms/", "--token", "t", "--insecure", "exists", "h",
        ])
        .unwrap();
        let config = cli.client_config().unwrap();
        assert_eq!(config.base_url(), "https://nms/api/v0");
        assert!(!config.tls_verify());
        assert!(config.timeout().is_none());
    }
}
