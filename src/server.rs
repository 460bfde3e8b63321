//! Server handle: zone listing, lookup, lifecycle and search.
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::backup;
use crate::cache::Cached;
use crate::error::{PdnsError, Result};
use crate::powerdns::transport::{Transport, fetch, is_truthy};
use crate::powerdns::types::{ConfigSetting, DaemonType, PdnsServer, PdnsZone, PdnsZoneCreate, SearchResult};
use crate::validation;
use crate::zone::Zone;

pub const DEFAULT_SEARCH_MAX: usize = 100;

/// A PowerDNS daemon as listed by `GET /servers`.
///
/// The zone list is fetched once and kept until a zone is created, updated,
/// deleted or restored through this handle.
pub struct Server {
    transport: Arc<dyn Transport>,
    sid: String,
    url: String,
    data: PdnsServer,
    zones: Cached<Vec<Zone>>,
}

impl Server {
    pub(crate) fn new(transport: Arc<dyn Transport>, data: PdnsServer) -> Self {
        Self {
            transport,
            sid: data.id.clone(),
            url: format!("/servers/{}", data.id),
            data,
            zones: Cached::default(),
        }
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn version(&self) -> &str {
        &self.data.version
    }

    pub fn daemon_type(&self) -> &DaemonType {
        &self.data.daemon_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn data(&self) -> &PdnsServer {
        &self.data
    }

    /// Live server configuration, never cached.
    pub fn config(&self) -> Result<Vec<ConfigSetting>> {
        info!("getting server configuration");
        fetch(self.transport.as_ref(), &format!("{}/config", self.url))
    }

    pub fn zones(&mut self) -> Result<&mut [Zone]> {
        info!("listing available zones");
        let transport = &self.transport;
        let sid = &self.sid;
        let url = &self.url;
        let zones = self.zones.get_or_load(|| {
            info!("getting available zones from API");
            let listed: Vec<PdnsZone> = fetch(transport.as_ref(), &format!("{}/zones", url))?;
            Ok::<_, PdnsError>(
                listed
                    .into_iter()
                    .map(|data| Zone::new(Arc::clone(transport), sid, url, data))
                    .collect(),
            )
        })?;
        info!("{} zone(s) listed", zones.len());
        Ok(zones.as_mut_slice())
    }

    pub fn is_loaded(&self) -> bool {
        self.zones.is_loaded()
    }

    pub fn invalidate(&mut self) {
        self.zones.invalidate();
    }

    /// Zone named exactly `name`, or `None`.
    pub fn get_zone(&mut self, name: &str) -> Result<Option<&mut Zone>> {
        info!("getting zone: {}", name);
        let found = self.zones()?.iter_mut().find(|zone| zone.name() == name);
        match &found {
            Some(zone) => debug!("found zone: {}", zone),
            None => info!("zone not found: {}", name),
        }
        Ok(found)
    }

    /// Most specific zone that `r_name` (canonical) belongs to.
    ///
    /// ```text
    /// record: a.test.sub.domain.tld.
    /// zone:              domain.tld.
    /// zone:          sub.domain.tld.   <== best match
    /// zone:      another.domain.tld.
    /// ```
    ///
    /// Among equally long matches the first listed zone wins.
    pub fn suggest_zone(&mut self, r_name: &str) -> Result<Option<&mut Zone>> {
        info!("suggesting zone for: {}", r_name);
        validation::require_canonical(r_name)?;

        let zones = self.zones()?;
        let mut best: Option<usize> = None;
        for (idx, zone) in zones.iter().enumerate() {
            if !validation::is_subdomain_of(r_name, zone.name()) {
                continue;
            }
            match best {
                Some(current) if zones[current].name().len() >= zone.name().len() => {}
                _ => best = Some(idx),
            }
        }

        let best = match best {
            Some(idx) => Some(&mut zones[idx]),
            None => None,
        };
        info!(
            "zone best match: {}",
            best.as_ref().map(|zone| zone.name()).unwrap_or("none")
        );
        Ok(best)
    }

    /// Creates a zone, or updates the listed zone of the same name when
    /// `update` is set. `Ok(None)` when the server confirms nothing.
    pub fn create_zone(&mut self, request: &PdnsZoneCreate, update: bool) -> Result<Option<Zone>> {
        let body = serde_json::to_value(request)?;

        let answer = if update {
            info!("update of zone: {}", request.name);
            let zone_id = {
                let zone = self
                    .get_zone(&request.name)?
                    .ok_or_else(|| PdnsError::ZoneNotFound {
                        name: request.name.clone(),
                    })?;
                let context = format!("details of zone {}", zone.name());
                zone.details()?
                    .id
                    .clone()
                    .ok_or_else(|| PdnsError::missing_field("id", context))?
            };
            self.zones.invalidate();
            self.transport
                .patch(&format!("{}/zones/{}", self.url, zone_id), &body)?
        } else {
            info!("creation of zone: {}", request.name);
            self.zones.invalidate();
            self.transport.post(&format!("{}/zones", self.url), &body)?
        };

        if !is_truthy(&answer) {
            return Ok(None);
        }
        info!("zone {} successfully processed", request.name);
        self.wrap_zone(answer).map(Some)
    }

    /// Deletes the zone `name`.
    pub fn delete_zone(&mut self, name: &str) -> Result<Option<Value>> {
        self.zones.invalidate();
        info!("deletion of zone: {}", name);
        self.transport.delete(&format!("{}/zones/{}", self.url, name))
    }

    /// Re-creates a zone from a file written by [`Zone::backup`]. The
    /// nameserver list is emptied so the destination assigns its own.
    pub fn restore_zone(&mut self, json_file: impl AsRef<Path>) -> Result<Option<Zone>> {
        let mut zone_data: PdnsZone = backup::read_json(json_file.as_ref())?;
        self.zones.invalidate();
        let zone_name = zone_data.name.clone();
        zone_data
            .extra
            .insert("nameservers".to_string(), Value::Array(Vec::new()));
        info!("restoration of zone: {}", zone_name);

        let answer = self
            .transport
            .post(&format!("{}/zones", self.url), &serde_json::to_value(&zone_data)?)?;
        if !is_truthy(&answer) {
            info!("{} zone restoration failed", zone_name);
            return Ok(None);
        }
        let zone = self.wrap_zone(answer)?;
        info!("zone successfully restored: {}", zone.name());
        Ok(Some(zone))
    }

    /// Full-text search over zones, records and comments.
    pub fn search(&self, search_term: &str, max_result: usize) -> Result<Vec<SearchResult>> {
        info!("api search terms: {}", search_term);
        let results: Vec<SearchResult> = fetch(
            self.transport.as_ref(),
            &format!("{}/search-data?q={}&max={}", self.url, search_term, max_result),
        )?;
        info!("{} search result(s)", results.len());
        debug!("search results: {:?}", results);
        Ok(results)
    }

    fn wrap_zone(&self, answer: Option<Value>) -> Result<Zone> {
        let value = answer.unwrap_or(Value::Null);
        if value.get("name").and_then(Value::as_str).is_none() {
            return Err(PdnsError::missing_field("name", format!("zone answer from {}", self.sid)));
        }
        let data: PdnsZone = serde_json::from_value(value)?;
        Ok(Zone::new(Arc::clone(&self.transport), &self.sid, &self.url, data))
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sid)
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("sid", &self.sid)
            .field("version", &self.data.version)
            .field("daemon_type", &self.data.daemon_type)
            .field("zones_loaded", &self.zones.is_loaded())
            .finish()
    }
}
