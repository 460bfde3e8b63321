//! Client library and object model for the PowerDNS HTTP API.
//!
//! [`Endpoint`] lists [`Server`]s, a server lists [`Zone`]s, and a zone
//! exposes its RRSets. Lists and zone details are cached on first read
//! and reset by mutations issued through the same object. Everything is
//! blocking; callers sharing one object across threads must serialize
//! access themselves.
//!
//! ```no_run
//! use pdns_api::{ClientConfig, Endpoint, Rrset};
//!
//! # fn main() -> pdns_api::Result<()> {
//! let mut api = Endpoint::connect(
//!     ClientConfig::new("http://127.0.0.1:8081/api/v1").with_api_key("changeme"),
//! )?;
//! let server = &mut api.servers()?[0];
//! if let Some(zone) = server.suggest_zone("www.example.com.")? {
//!     let mut rrsets = [Rrset::new("www", "A", ["192.0.2.10"])?.with_ttl(300)];
//!     zone.create_records(&mut rrsets)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod cache;
pub mod comment;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod powerdns;
pub mod rrset;
pub mod server;
pub mod validation;
pub mod zone;

pub use comment::Comment;
pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::{PdnsError, Result};
pub use powerdns::client::ApiClient;
pub use powerdns::transport::Transport;
pub use powerdns::types::{ChangeType, DaemonType, PdnsRecord, PdnsRrset, PdnsZone, PdnsZoneCreate, SearchResult};
pub use rrset::{RecordInput, Rrset};
pub use server::Server;
pub use validation::ValidationError;
pub use zone::Zone;
