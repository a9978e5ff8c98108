//! Request DTOs for the cache server API
//!
//! Query parameters arrive as raw strings and are integer-parsed by hand,
//! so a malformed value surfaces as the API's own 400 `{"error": ...}`
//! response instead of an extractor rejection. An empty parameter value is
//! treated the same as an absent one.

use serde::Deserialize;

use crate::error::{CacheError, Result};

/// Query parameters for GET `values/{key}`.
///
/// `listIndex` takes precedence over `dictKey` when both are supplied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetValueParams {
    /// Position to project out of a list value
    #[serde(default)]
    pub list_index: Option<String>,
    /// Sub-key to project out of a dictionary value
    #[serde(default)]
    pub dict_key: Option<String>,
}

impl GetValueParams {
    /// The list index, if one was supplied. Rejects anything that does not
    /// parse as a non-negative integer.
    pub fn parsed_list_index(&self) -> Result<Option<usize>> {
        match self.list_index.as_deref().filter(|raw| !raw.is_empty()) {
            None => Ok(None),
            Some(raw) => raw.parse::<usize>().map(Some).map_err(|_| {
                CacheError::InvalidArgument(
                    "Invalid `listIndex` param. Number required".to_string(),
                )
            }),
        }
    }

    /// The dictionary sub-key, if one was supplied.
    pub fn dict_key(&self) -> Option<&str> {
        self.dict_key.as_deref().filter(|raw| !raw.is_empty())
    }
}

/// Query parameters for PUT `values/{key}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PutValueParams {
    /// TTL in seconds; absent means the entry is stored without expiration
    #[serde(default)]
    pub expire: Option<String>,
}

impl PutValueParams {
    /// The expire argument as seconds, defaulting to `-1` (no expiration)
    /// when the parameter is absent.
    pub fn parsed_expire(&self) -> Result<i64> {
        match self.expire.as_deref().filter(|raw| !raw.is_empty()) {
            None => Ok(-1),
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| CacheError::InvalidArgument("Invalid expire value".to_string())),
        }
    }
}
