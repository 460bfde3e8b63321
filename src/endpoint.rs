use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::Cached;
use crate::config::ClientConfig;
use crate::error::{PdnsError, Result};
use crate::powerdns::client::ApiClient;
use crate::powerdns::transport::{Transport, fetch};
use crate::powerdns::types::PdnsServer;
use crate::server::Server;

/// Root of the object graph: owns the server list.
pub struct Endpoint {
    transport: Arc<dyn Transport>,
    servers: Cached<Vec<Server>>,
}

impl Endpoint {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            servers: Cached::default(),
        }
    }

    /// Endpoint talking HTTP through an [`ApiClient`].
    pub fn connect(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(ApiClient::new(config)?)))
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn servers(&mut self) -> Result<&mut [Server]> {
        info!("listing available PowerDNS servers");
        let transport = &self.transport;
        let servers = self.servers.get_or_load(|| {
            info!("getting available servers from API");
            let listed: Vec<PdnsServer> = fetch(transport.as_ref(), "/servers")?;
            Ok::<_, PdnsError>(
                listed
                    .into_iter()
                    .map(|data| Server::new(Arc::clone(transport), data))
                    .collect(),
            )
        })?;
        info!("{} server(s) listed", servers.len());
        debug!("listed servers: {:?}", servers);
        Ok(servers.as_mut_slice())
    }

    /// Server whose id is `sid`, or `None`.
    pub fn server(&mut self, sid: &str) -> Result<Option<&mut Server>> {
        Ok(self.servers()?.iter_mut().find(|server| server.sid() == sid))
    }

    pub fn invalidate(&mut self) {
        self.servers.invalidate();
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.transport.base_url())
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({})", self.transport.base_url())
    }
}
