//! Record input validation and canonical DNS name helpers.
use crate::error::{PdnsError, Result};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("record {0} has keys other than 'content' and 'disabled'")]
    UnexpectedKeys(String),
    #[error("record {0} does not have the 'content' key")]
    MissingContent(String),
    #[error("record {0} has a non-string 'content'")]
    InvalidContent(String),
    #[error("record {0} has a non-boolean 'disabled'")]
    InvalidDisabled(String),
}

/// A name is canonical when it is fully qualified, i.e. ends with a dot.
pub fn is_canonical(name: &str) -> bool {
    name.ends_with('.')
}

pub fn require_canonical(name: &str) -> Result<()> {
    if is_canonical(name) {
        Ok(())
    } else {
        Err(PdnsError::not_canonical(name))
    }
}

/// Appends `zone` to a relative `name`. `zone` must already be canonical.
pub fn qualify(name: &str, zone: &str) -> String {
    format!("{name}.{zone}")
}

/// True when `zone` is a dot-delimited proper suffix of `name`.
pub fn is_subdomain_of(name: &str, zone: &str) -> bool {
    name.len() > zone.len()
        && name.ends_with(zone)
        && name.as_bytes()[name.len() - zone.len() - 1] == b'.'
}
