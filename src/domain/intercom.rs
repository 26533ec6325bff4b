//! Wire types shared with the intercom base unit

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error when parsing a collection name
#[derive(Debug, Clone, Error)]
#[error("Invalid collection: \"{input}\". Valid collections are: messages, records")]
pub struct InvalidCollectionError {
    pub input: String,
}

/// The two parallel recording collections on the server.
///
/// `messages` holds greeting messages the unit plays; `records` holds
/// archived call recordings. Both share the same record shape and path
/// conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collection {
    #[default]
    Messages,
    Records,
}

impl Collection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Records => "records",
        }
    }

    /// Playback/download path for one entry: `/<collection>/<id>/binary`
    pub fn binary_path(&self, id: &str) -> String {
        format!("/{}/{}/binary", self.as_str(), id)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Collection {
    type Err = InvalidCollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "messages" => Ok(Self::Messages),
            "records" => Ok(Self::Records),
            other => Err(InvalidCollectionError {
                input: other.to_string(),
            }),
        }
    }
}

/// Metadata of one stored recording, as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInfo {
    /// Opaque identifier assigned by the server
    pub id: String,
    /// Recording length in milliseconds
    pub length: u64,
    /// Creation time, Unix seconds
    pub record_timestamp: i64,
}

/// The unit's flat settings object.
///
/// Read via fetch-and-populate, written via full-object replace; the server
/// does not support partial updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSettings {
    pub auto_ring: bool,
    pub auto_ring_min_span: u32,
    pub auto_ring_max_span: u32,
    pub ring_on_time: u32,
    pub ring_off_time: u32,
    pub messages: bool,
    pub random_messages: bool,
    pub ring_count: u32,
}
