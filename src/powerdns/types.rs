use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::comment::Comment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsServer {
    pub id: String, // "localhost"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>, // "Server"
    #[serde(default)]
    pub version: String,
    pub daemon_type: DaemonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>, // "/api/v1/servers/localhost"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaemonType {
    Authoritative,
    Recursor,
    #[serde(other)]
    Other,
}

/// Zone as listed by the server, as returned in full by the zone endpoint,
/// and as stored in backup files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsZone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>, // "example.com."
    pub name: String, // "example.com."
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>, // "Zone"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>, // "Native", "Master", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrsets: Option<Vec<PdnsRrset>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Replace,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsRrset {
    pub name: String, // "www.example.com."
    #[serde(rename = "type")]
    pub rrtype: String, // "A", "NS", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changetype: Option<ChangeType>, // only when patching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub records: Vec<PdnsRecord>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsRecord {
    pub content: String, // "192.0.2.1" or "ns1.example.net."
    #[serde(default)]
    pub disabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PdnsRecord {
    pub fn new(content: impl Into<String>, disabled: bool) -> Self {
        Self {
            content: content.into(),
            disabled,
            extra: Map::new(),
        }
    }
}

// Used when creating or updating a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdnsZoneCreate {
    pub name: String,             // "sub.example.com."
    pub kind: String,             // "Native"
    pub nameservers: Vec<String>, // ["ns1.example.net.", "ns2.example.net."]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<String>, // forwarded-to servers, recursor only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrsets: Vec<PdnsRrset>,
}

impl PdnsZoneCreate {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        nameservers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            nameservers: nameservers.into_iter().map(Into::into).collect(),
            masters: Vec::new(),
            servers: Vec::new(),
            rrsets: Vec::new(),
        }
    }

    pub fn with_masters(mut self, masters: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.masters = masters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_servers(mut self, servers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.servers = servers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rrsets<'a>(mut self, rrsets: impl IntoIterator<Item = &'a crate::rrset::Rrset>) -> Self {
        self.rrsets = rrsets.into_iter().map(|rrset| rrset.to_wire()).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSetting {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub setting_type: Option<String>, // "ConfigSetting"
    #[serde(default)]
    pub value: Value,
}

/// One hit of the `search-data` endpoint. Passed through without checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object_type", rename_all = "lowercase")]
pub enum SearchResult {
    Zone {
        #[serde(default)]
        name: String,
        #[serde(default)]
        zone_id: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Record {
        #[serde(default)]
        content: String,
        #[serde(default)]
        disabled: bool,
        #[serde(default)]
        name: String,
        #[serde(default)]
        ttl: Option<u32>,
        #[serde(rename = "type", default)]
        rrtype: String,
        #[serde(default)]
        zone: String,
        #[serde(default)]
        zone_id: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Comment {
        #[serde(default)]
        name: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        zone: String,
        #[serde(default)]
        zone_id: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl SearchResult {
    pub fn name(&self) -> &str {
        match self {
            SearchResult::Zone { name, .. }
            | SearchResult::Record { name, .. }
            | SearchResult::Comment { name, .. } => name,
        }
    }

    pub fn zone_id(&self) -> &str {
        match self {
            SearchResult::Zone { zone_id, .. }
            | SearchResult::Record { zone_id, .. }
            | SearchResult::Comment { zone_id, .. } => zone_id,
        }
    }
}
