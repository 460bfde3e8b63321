use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdns_api::{
    ClientConfig, Endpoint, PdnsZoneCreate, Rrset, Server, server::DEFAULT_SEARCH_MAX,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// PowerDNS API URL (e.g. http://127.0.0.1:8081/api/v1)
    #[arg(long, value_name = "URL", env = "PDNS_API_URL")]
    api_url: String,
    /// PowerDNS API key
    #[arg(long, value_name = "KEY", env = "PDNS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// PowerDNS server ID
    #[arg(long, value_name = "ID", default_value = "localhost")]
    server: String,
    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,
    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// List servers
    Servers,
    /// List zones of the selected server
    Zones,
    /// Show the live server configuration
    Config,
    /// Show RRSets of a zone
    Records {
        zone: String,
        /// Only RRSets with this (canonical) name
        #[arg(long)]
        name: Option<String>,
    },
    /// Suggest the zone a canonical record name belongs to
    Suggest { record: String },
    /// Create or replace an RRSet
    AddRecord {
        zone: String,
        name: String,
        rtype: String,
        #[arg(required = true)]
        content: Vec<String>,
        #[arg(long, default_value_t = pdns_api::rrset::DEFAULT_TTL)]
        ttl: u32,
    },
    /// Delete an RRSet
    DeleteRecord {
        zone: String,
        name: String,
        rtype: String,
    },
    /// Create a zone
    CreateZone {
        zone: String,
        #[arg(long, default_value = "Native")]
        kind: String,
        /// Nameserver FQDN (repeat for multiple values)
        #[arg(long = "nameserver", value_name = "FQDN")]
        nameservers: Vec<String>,
        /// Master address (repeat for multiple values)
        #[arg(long = "master", value_name = "ADDR")]
        masters: Vec<String>,
        /// Update the existing zone instead of creating it
        #[arg(long)]
        update: bool,
    },
    /// Delete a zone
    DeleteZone { zone: String },
    /// Write zone details to a JSON file
    Backup {
        zone: String,
        dir: PathBuf,
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        pretty: bool,
    },
    /// Re-create a zone from a backup file
    Restore { file: PathBuf },
    /// Trigger NOTIFY for a zone
    Notify { zone: String },
    /// Search zones, records and comments
    Search {
        term: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_MAX)]
        max: usize,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut endpoint = Endpoint::connect(build_client_config(&cli))
        .with_context(|| format!("failed to set up client for {}", cli.api_url))?;

    if let Command::Servers = cli.command {
        let servers: Vec<_> = endpoint
            .servers()
            .context("failed to list servers")?
            .iter()
            .map(|server| server.data().clone())
            .collect();
        return print_json(&servers);
    }

    let server = endpoint
        .server(&cli.server)
        .context("failed to list servers")?
        .with_context(|| format!("server '{}' not found", cli.server))?;
    run(server, cli.command)
}

fn run(server: &mut Server, command: Command) -> Result<()> {
    match command {
        Command::Servers => unreachable!("handled before server lookup"),
        Command::Zones => {
            let names: Vec<String> = server
                .zones()
                .context("failed to list zones")?
                .iter()
                .map(|zone| zone.name().to_string())
                .collect();
            print_json(&names)
        }
        Command::Config => print_json(&server.config().context("failed to read config")?),
        Command::Records { zone, name } => {
            let zone = find_zone(server, &zone)?;
            match name {
                Some(name) => print_json(&zone.get_record(&name)?),
                None => print_json(&zone.records()?),
            }
        }
        Command::Suggest { record } => {
            let zone = server
                .suggest_zone(&record)?
                .with_context(|| format!("no zone matches '{record}'"))?;
            println!("{}", zone);
            Ok(())
        }
        Command::AddRecord {
            zone,
            name,
            rtype,
            content,
            ttl,
        } => {
            let zone = find_zone(server, &zone)?;
            let mut rrsets = [Rrset::new(name, rtype, content)?.with_ttl(ttl)];
            zone.create_records(&mut rrsets)
                .context("failed to create records")?;
            info!("created {}", rrsets[0]);
            Ok(())
        }
        Command::DeleteRecord { zone, name, rtype } => {
            let zone = find_zone(server, &zone)?;
            let mut rrsets = [Rrset::new(name, rtype, Vec::<String>::new())?];
            zone.delete_records(&mut rrsets)
                .context("failed to delete records")?;
            Ok(())
        }
        Command::CreateZone {
            zone,
            kind,
            nameservers,
            masters,
            update,
        } => {
            let request = PdnsZoneCreate::new(&zone, kind, nameservers).with_masters(masters);
            match server.create_zone(&request, update)? {
                Some(created) => print_json(created.data()),
                None => bail!("server did not confirm zone {zone}"),
            }
        }
        Command::DeleteZone { zone } => {
            server
                .delete_zone(&zone)
                .with_context(|| format!("failed to delete zone {zone}"))?;
            Ok(())
        }
        Command::Backup {
            zone,
            dir,
            file,
            pretty,
        } => {
            let path = find_zone(server, &zone)?
                .backup(&dir, file.as_deref(), pretty)
                .with_context(|| format!("failed to back up zone {zone}"))?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Restore { file } => {
            match server
                .restore_zone(&file)
                .with_context(|| format!("failed to restore {}", file.display()))?
            {
                Some(zone) => {
                    println!("{}", zone);
                    Ok(())
                }
                None => bail!("server did not confirm restoration of {}", file.display()),
            }
        }
        Command::Notify { zone } => {
            find_zone(server, &zone)?.notify()?;
            Ok(())
        }
        Command::Search { term, max } => print_json(&server.search(&term, max)?),
    }
}

fn find_zone<'a>(server: &'a mut Server, name: &str) -> Result<&'a mut pdns_api::Zone> {
    let sid = server.sid().to_string();
    server
        .get_zone(name)?
        .with_context(|| format!("zone '{name}' not found on {sid}"))
}

fn build_client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::new(&cli.api_url).with_verify(!cli.insecure);
    if let Some(key) = &cli.api_key {
        config = config.with_api_key(key);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "info";

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_logs_operations() {
        let filter = tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER);
        assert_eq!(filter.max_level_hint(), Some(tracing::level_filters::LevelFilter::INFO));
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "pdns-cli",
            "--api-url",
            "http://127.0.0.1:8081/api/v1",
            "--insecure",
            "servers",
        ])
        .unwrap();
        assert_eq!(cli.server, "localhost");
        assert!(cli.insecure);
    }
}
