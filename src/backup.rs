//! Zone backup files.
//!
//! Output is always pure ASCII: every non-ASCII character is written as a
//! `\uXXXX` escape (surrogate pairs above the BMP). Pretty output uses a
//! two-space indent with keys sorted.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::Result;

pub fn to_ascii_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let encoded = if pretty {
        serde_json::to_string_pretty(&SortedKeys(&serde_json::to_value(value)?))?
    } else {
        serde_json::to_string(value)?
    };
    Ok(escape_non_ascii(&encoded))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    fs::write(path, to_ascii_json(value, pretty)?)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

// Orders object keys regardless of serde_json's `preserve_order` feature.
struct SortedKeys<'a>(&'a Value);

impl Serialize for SortedKeys<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => serializer.collect_map(
                map.iter()
                    .map(|(key, value)| (key, SortedKeys(value)))
                    .collect::<BTreeMap<_, _>>(),
            ),
            Value::Array(items) => serializer.collect_seq(items.iter().map(SortedKeys)),
            other => other.serialize(serializer),
        }
    }
}

// Non-ASCII can only occur inside JSON strings, where an escape is equivalent.
fn escape_non_ascii(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    for ch in encoded.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
