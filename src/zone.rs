//! Zone handle with cached details.
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::backup;
use crate::cache::Cached;
use crate::error::{PdnsError, Result};
use crate::powerdns::transport::{Transport, fetch};
use crate::powerdns::types::{ChangeType, PdnsRrset, PdnsZone};
use crate::rrset::Rrset;

/// A zone hosted on a server.
///
/// Zones only come out of a [`crate::server::Server`] (listing, creation or
/// restoration). The details fetched from `GET <server>/zones/<name>` are
/// kept until a record mutation goes through this handle.
///
/// Not meant to be mutated from several threads at once.
pub struct Zone {
    transport: Arc<dyn Transport>,
    server_id: String,
    name: String,
    url: String,
    data: PdnsZone,
    details: Cached<Details>,
}

// The blob as served is what backups write out.
struct Details {
    raw: Value,
    zone: PdnsZone,
}

impl Zone {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        server_id: &str,
        server_url: &str,
        data: PdnsZone,
    ) -> Self {
        Self {
            transport,
            server_id: server_id.to_string(),
            name: data.name.clone(),
            url: format!("{}/zones/{}", server_url, data.name),
            data,
            details: Cached::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Id of the owning server.
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// Data the server returned when this handle was created.
    pub fn data(&self) -> &PdnsZone {
        &self.data
    }

    pub fn details(&mut self) -> Result<&PdnsZone> {
        info!("getting {} zone details", self.name);
        Ok(&self.load_details()?.zone)
    }

    /// Zone details exactly as the server returned them.
    pub fn raw_details(&mut self) -> Result<&Value> {
        Ok(&self.load_details()?.raw)
    }

    fn load_details(&mut self) -> Result<&Details> {
        let transport = &self.transport;
        let url = &self.url;
        let name = &self.name;
        let details = self.details.get_or_load(|| {
            info!("getting {} zone details from api", name);
            let raw = fetch::<Value>(transport.as_ref(), url)?;
            let zone = serde_json::from_value(raw.clone())?;
            Ok::<_, PdnsError>(Details { raw, zone })
        })?;
        Ok(&*details)
    }

    pub fn is_loaded(&self) -> bool {
        self.details.is_loaded()
    }

    pub fn invalidate(&mut self) {
        self.details.invalidate();
    }

    pub fn records(&mut self) -> Result<&[PdnsRrset]> {
        info!("getting {} zone records", self.name);
        Ok(self.details()?.rrsets.as_deref().unwrap_or_default())
    }

    /// All RRSets named `name`, one per record type.
    pub fn get_record(&mut self, name: &str) -> Result<Vec<&PdnsRrset>> {
        info!("getting zone record: {}", name);
        let found: Vec<&PdnsRrset> = self
            .records()?
            .iter()
            .filter(|rrset| rrset.name == name)
            .collect();
        if found.is_empty() {
            info!("record not found: {}", name);
        } else {
            info!("record found: {}", name);
        }
        Ok(found)
    }

    /// Replaces the given RRSets. Relative names are qualified with the zone.
    pub fn create_records(&mut self, rrsets: &mut [Rrset]) -> Result<Option<Value>> {
        info!("creating {} record(s) to {}", rrsets.len(), self.name);
        self.patch_rrsets(rrsets, ChangeType::Replace)
    }

    pub fn delete_records(&mut self, rrsets: &mut [Rrset]) -> Result<Option<Value>> {
        info!("deletion of {} records from {}", rrsets.len(), self.name);
        self.patch_rrsets(rrsets, ChangeType::Delete)
    }

    fn patch_rrsets(&mut self, rrsets: &mut [Rrset], changetype: ChangeType) -> Result<Option<Value>> {
        #[derive(Serialize)]
        struct PatchBody {
            rrsets: Vec<PdnsRrset>,
        }

        for rrset in rrsets.iter_mut() {
            rrset.ensure_canonical(&self.name)?;
            rrset.changetype = changetype;
        }
        let body = PatchBody {
            rrsets: rrsets.iter().map(Rrset::to_wire).collect(),
        };
        debug!("records: {:?}", body.rrsets);
        let body = serde_json::to_value(&body)?;

        self.details.invalidate();
        self.transport.patch(&self.url, &body)
    }

    /// Writes the zone details to `directory/filename`, defaulting the file
    /// name to the zone name without its trailing dot plus `.json`.
    pub fn backup(
        &mut self,
        directory: impl AsRef<Path>,
        filename: Option<&str>,
        pretty: bool,
    ) -> Result<PathBuf> {
        info!("backup of zone: {}", self.name);
        let filename = match filename {
            Some(filename) => filename.to_string(),
            None => format!("{}.json", self.name.trim_end_matches('.')),
        };
        let path = directory.as_ref().join(filename);
        info!("backup file is {}", path.display());

        let name = self.name.clone();
        backup::write_json(&path, self.raw_details()?, pretty)?;
        info!("zone {} successfully saved", name);
        Ok(path)
    }

    /// Asks the server to notify the zone's secondaries.
    pub fn notify(&self) -> Result<Option<Value>> {
        info!("notify of zone: {}", self.name);
        self.transport.put(&format!("{}/notify", self.url), None)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("name", &self.name)
            .field("server_id", &self.server_id)
            .field("url", &self.url)
            .field("details_loaded", &self.details.is_loaded())
            .finish()
    }
}
