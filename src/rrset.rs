//! Caller-built resource record sets.
//!
//! An [`Rrset`] normalizes whatever record shapes it is given into
//! `{content, disabled}` pairs and can rewrite relative names against a
//! zone before submission. [`Rrset::to_wire`] produces the payload sent to
//! the API.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::comment::Comment;
use crate::error::Result;
use crate::powerdns::types::{ChangeType, PdnsRecord, PdnsRrset};
use crate::validation::{self, ValidationError};

pub const DEFAULT_TTL: u32 = 3600;

/// A record as supplied by the caller, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordInput {
    Content(String),
    Pair(String, bool),
    Object(Map<String, Value>),
}

impl RecordInput {
    fn content(&self) -> Option<&str> {
        match self {
            RecordInput::Content(content) | RecordInput::Pair(content, _) => Some(content),
            RecordInput::Object(map) => map.get("content").and_then(Value::as_str),
        }
    }

    fn normalize(&self) -> std::result::Result<PdnsRecord, ValidationError> {
        match self {
            RecordInput::Content(content) => Ok(PdnsRecord::new(content.clone(), false)),
            RecordInput::Pair(content, disabled) => Ok(PdnsRecord::new(content.clone(), *disabled)),
            RecordInput::Object(map) => {
                let rendered = || Value::Object(map.clone()).to_string();
                if map.keys().any(|key| key != "content" && key != "disabled") {
                    return Err(ValidationError::UnexpectedKeys(rendered()));
                }
                let content = match map.get("content") {
                    None => return Err(ValidationError::MissingContent(rendered())),
                    Some(Value::String(content)) => content.clone(),
                    Some(_) => return Err(ValidationError::InvalidContent(rendered())),
                };
                let disabled = match map.get("disabled") {
                    None => false,
                    Some(Value::Bool(disabled)) => *disabled,
                    Some(_) => return Err(ValidationError::InvalidDisabled(rendered())),
                };
                Ok(PdnsRecord::new(content, disabled))
            }
        }
    }
}

impl From<&str> for RecordInput {
    fn from(content: &str) -> Self {
        RecordInput::Content(content.to_string())
    }
}

impl From<String> for RecordInput {
    fn from(content: String) -> Self {
        RecordInput::Content(content)
    }
}

impl<S: Into<String>> From<(S, bool)> for RecordInput {
    fn from((content, disabled): (S, bool)) -> Self {
        RecordInput::Pair(content.into(), disabled)
    }
}

impl From<Map<String, Value>> for RecordInput {
    fn from(map: Map<String, Value>) -> Self {
        RecordInput::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rrset {
    pub name: String,
    pub rtype: String,
    pub ttl: u32,
    pub changetype: ChangeType,
    pub records: Vec<PdnsRecord>,
    pub comments: Vec<Comment>,
    raw_records: Vec<RecordInput>,
}

impl Rrset {
    /// Builds a `REPLACE` set with the default TTL and no comments.
    pub fn new<I, R>(name: impl Into<String>, rtype: impl Into<String>, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<RecordInput>,
    {
        let name = name.into();
        debug!("new rrset object for {}", name);
        let raw_records: Vec<RecordInput> = records.into_iter().map(Into::into).collect();
        let records = raw_records
            .iter()
            .map(RecordInput::normalize)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            rtype: rtype.into(),
            ttl: DEFAULT_TTL,
            changetype: ChangeType::Replace,
            records,
            comments: Vec::new(),
            raw_records,
        })
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_changetype(mut self, changetype: ChangeType) -> Self {
        self.changetype = changetype;
        self
    }

    pub fn with_comments(mut self, comments: impl IntoIterator<Item = Comment>) -> Self {
        self.comments = comments.into_iter().collect();
        self
    }

    /// Records exactly as they were handed to [`Rrset::new`].
    pub fn raw_records(&self) -> &[RecordInput] {
        &self.raw_records
    }

    /// Qualifies a relative name (and relative CNAME targets) with `zone`.
    ///
    /// The rewrite is in place and cannot be undone.
    pub fn ensure_canonical(&mut self, zone: &str) -> Result<()> {
        debug!("ensuring rrset {} is canonical", self.name);
        validation::require_canonical(zone)?;
        if !validation::is_canonical(&self.name) {
            debug!("transforming {} with {}", self.name, zone);
            self.name = validation::qualify(&self.name, zone);
        }
        if self.rtype == "CNAME" {
            for record in &mut self.records {
                if !validation::is_canonical(&record.content) {
                    debug!("transforming {} with {}", record.content, zone);
                    record.content = validation::qualify(&record.content, zone);
                }
            }
        }
        Ok(())
    }

    pub fn to_wire(&self) -> PdnsRrset {
        PdnsRrset {
            name: self.name.clone(),
            rrtype: self.rtype.clone(),
            changetype: Some(self.changetype),
            ttl: Some(self.ttl),
            records: self.records.clone(),
            comments: self.comments.clone(),
            extra: Map::new(),
        }
    }
}

impl fmt::Display for Rrset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contents: Vec<&str> = self
            .raw_records
            .iter()
            .filter_map(RecordInput::content)
            .collect();
        let comments: Vec<&str> = self.comments.iter().map(|c| c.content.as_str()).collect();
        write!(
            f,
            "(ttl={}) {}  {}  {:?} {:?}",
            self.ttl, self.name, self.rtype, contents, comments
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdnsError;
    use serde_json::json;

    fn object(value: Value) -> RecordInput {
        match value {
            Value::Object(map) => RecordInput::Object(map),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn object_records_normalize() {
        let rrset = Rrset::new(
            "test",
            "TXT",
            [
                object(json!({"content": "foo"})),
                object(json!({"content": "bar", "disabled": false})),
                object(json!({"content": "baz", "disabled": true})),
            ],
        )
        .unwrap();
        assert_eq!(
            rrset.records,
            vec![
                PdnsRecord::new("foo", false),
                PdnsRecord::new("bar", false),
                PdnsRecord::new("baz", true),
            ]
        );
    }

    #[test]
    fn additional_key_is_rejected() {
        let err = Rrset::new(
            "test",
            "TXT",
            [object(json!({"content": "baz", "disabled": true, "foo": "bar"}))],
        )
        .unwrap_err();
        match err {
            PdnsError::Validation(ValidationError::UnexpectedKeys(record)) => {
                assert!(record.contains("\"foo\""));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_content_is_rejected() {
        let err = Rrset::new("test", "TXT", [object(json!({"disabled": true}))]).unwrap_err();
        assert!(matches!(
            err,
            PdnsError::Validation(ValidationError::MissingContent(_))
        ));
    }

    #[test]
    fn mistyped_values_are_rejected() {
        let err = Rrset::new("test", "TXT", [object(json!({"content": 1}))]).unwrap_err();
        assert!(matches!(
            err,
            PdnsError::Validation(ValidationError::InvalidContent(_))
        ));
        let err = Rrset::new("test", "TXT", [object(json!({"content": "x", "disabled": "no"}))])
            .unwrap_err();
        assert!(matches!(
            err,
            PdnsError::Validation(ValidationError::InvalidDisabled(_))
        ));
    }

    #[test]
    fn strings_and_pairs() {
        let rrset = Rrset::new(
            "test",
            "A",
            [RecordInput::from("192.0.2.1"), RecordInput::from(("192.0.2.2", true))],
        )
        .unwrap();
        assert_eq!(rrset.records[0], PdnsRecord::new("192.0.2.1", false));
        assert_eq!(rrset.records[1], PdnsRecord::new("192.0.2.2", true));
        assert_eq!(rrset.ttl, DEFAULT_TTL);
        assert_eq!(rrset.changetype, ChangeType::Replace);
        assert_eq!(rrset.raw_records().len(), 2);
    }

    #[test]
    fn wire_form() {
        let rrset = Rrset::new("www.test.tld.", "A", ["192.0.2.1"])
            .unwrap()
            .with_ttl(300)
            .with_comments([Comment::with_timestamp("web", "admin", 10)]);
        assert_eq!(
            serde_json::to_value(rrset.to_wire()).unwrap(),
            json!({
                "name": "www.test.tld.",
                "type": "A",
                "changetype": "REPLACE",
                "ttl": 300,
                "records": [{"content": "192.0.2.1", "disabled": false}],
                "comments": [{"content": "web", "account": "admin", "modified_at": 10}]
            })
        );
    }

    #[test]
    fn wire_records_keep_order() {
        let rrset = Rrset::new("test", "TXT", [("a", true), ("b", false), ("c", true)]).unwrap();
        let wire: PdnsRrset =
            serde_json::from_value(serde_json::to_value(rrset.to_wire()).unwrap()).unwrap();
        assert_eq!(wire.records, rrset.records);
    }

    #[test]
    fn relative_names_are_qualified() {
        for (name, zone) in [("www", "test.tld."), ("a.b", "sub.test.tld."), ("x", ".")] {
            let mut rrset = Rrset::new(name, "A", ["192.0.2.1"]).unwrap();
            rrset.ensure_canonical(zone).unwrap();
            assert_eq!(rrset.name, format!("{name}.{zone}"));
        }
    }

    #[test]
    fn canonical_names_are_kept() {
        let mut rrset = Rrset::new("www.other.tld.", "A", ["192.0.2.1"]).unwrap();
        rrset.ensure_canonical("test.tld.").unwrap();
        assert_eq!(rrset.name, "www.other.tld.");
    }

    #[test]
    fn cname_targets_are_qualified() {
        let mut rrset = Rrset::new("alias", "CNAME", ["www", "host.other.tld."]).unwrap();
        rrset.ensure_canonical("test.tld.").unwrap();
        assert_eq!(rrset.records[0].content, "www.test.tld.");
        assert_eq!(rrset.records[1].content, "host.other.tld.");
    }

    #[test]
    fn other_types_keep_content() {
        let mut rrset = Rrset::new("txt", "TXT", ["\"hello\""]).unwrap();
        rrset.ensure_canonical("test.tld.").unwrap();
        assert_eq!(rrset.records[0].content, "\"hello\"");
    }

    #[test]
    fn non_canonical_zone_fails_first() {
        for name in ["www", "www.test.tld."] {
            let mut rrset = Rrset::new(name, "A", ["192.0.2.1"]).unwrap();
            let err = rrset.ensure_canonical("test.tld").unwrap_err();
            assert!(matches!(err, PdnsError::NotCanonical { name } if name == "test.tld"));
            assert_eq!(rrset.name, name);
        }
    }

    #[test]
    fn display_uses_raw_records() {
        let rrset = Rrset::new("www", "A", [("192.0.2.1", false)]).unwrap();
        assert_eq!(rrset.to_string(), "(ttl=3600) www  A  [\"192.0.2.1\"] []");
    }
}
