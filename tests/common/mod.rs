#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use pdns_api::{Endpoint, PdnsError, Result, Transport};
use reqwest::Method;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

type Reply = Result<Option<Value>>;

/// In-memory transport answering from scripted replies and recording calls.
///
/// Replies queued with [`FakeTransport::enqueue`] are consumed in order;
/// once a route's queue is empty, the reply set with [`FakeTransport::route`]
/// is returned on every call, a `null` route standing for 204. Unknown
/// routes answer 404.
#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<Call>>,
    queued: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    fixed: Mutex<HashMap<(Method, String), Value>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, method: Method, path: &str, reply: Value) {
        self.fixed
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
    }

    pub fn enqueue(&self, method: Method, path: &str, reply: Reply) {
        self.queued
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    pub fn last(&self, method: Method, path: &str) -> Option<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|call| call.method == method && call.path == path)
            .cloned()
    }
}

impl Transport for FakeTransport {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        self.calls.lock().unwrap().push(Call {
            method: method.clone(),
            path: path.to_string(),
            body: body.cloned(),
        });
        let key = (method, path.to_string());
        if let Some(reply) = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }
        match self.fixed.lock().unwrap().get(&key) {
            Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(value.clone())),
            None => Err(PdnsError::NotFound {
                url: path.to_string(),
            }),
        }
    }

    fn base_url(&self) -> &str {
        "http://fake/api/v1"
    }
}

pub fn server_json(id: &str) -> Value {
    json!({
        "type": "Server",
        "id": id,
        "url": format!("/api/v1/servers/{id}"),
        "daemon_type": "authoritative",
        "version": "4.9.1",
        "config_url": format!("/api/v1/servers/{id}/config{{/config_setting}}"),
        "zones_url": format!("/api/v1/servers/{id}/zones{{/zone}}")
    })
}

pub fn zone_item(name: &str) -> Value {
    json!({
        "id": name,
        "name": name,
        "kind": "Native",
        "url": format!("/api/v1/servers/localhost/zones/{name}"),
        "serial": 2024010101u32
    })
}

pub fn zone_details(name: &str, rrsets: Value) -> Value {
    json!({
        "id": name,
        "name": name,
        "kind": "Native",
        "serial": 2024010101u32,
        "rrsets": rrsets
    })
}

pub fn rrset_json(name: &str, rtype: &str, contents: &[&str]) -> Value {
    let records: Vec<Value> = contents
        .iter()
        .map(|content| json!({"content": content, "disabled": false}))
        .collect();
    json!({
        "name": name,
        "type": rtype,
        "ttl": 3600,
        "records": records,
        "comments": []
    })
}

/// Transport serving one `localhost` server with the given zones.
pub fn with_zones(names: &[&str]) -> Arc<FakeTransport> {
    let transport = FakeTransport::new();
    transport.route(Method::GET, "/servers", json!([server_json("localhost")]));
    let zones: Vec<Value> = names.iter().map(|name| zone_item(name)).collect();
    transport.route(Method::GET, "/servers/localhost/zones", Value::Array(zones));
    transport
}

pub fn endpoint(transport: &Arc<FakeTransport>) -> Endpoint {
    Endpoint::new(transport.clone())
}
