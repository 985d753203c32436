//! Abstract record service contract.
//!
//! Implementations decide how records are reached (in-process, over a
//! network) and own connection timeouts and retry policy. Callers treat
//! every method as a blocking call that either returns or fails.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ChannelUnavailableError, TransportError};
use crate::field::{Field, Structure};

/// One populated leaf of a put.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Dotted path of the leaf.
    pub path: String,
    /// New contents of the leaf.
    pub value: Field,
}

/// The write half of a put/get exchange.
///
/// Only fields the client explicitly populated are carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutRequest {
    /// Unique identifier for this request (for log correlation).
    pub request_id: Uuid,

    /// Target record.
    pub channel: String,

    /// Leaves to write, in the order they were first populated.
    pub changes: Vec<FieldChange>,
}

impl PutRequest {
    /// Creates an empty request for `channel`.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            channel: channel.into(),
            changes: Vec::new(),
        }
    }

    /// Adds a change, builder style.
    #[must_use]
    pub fn with_change(mut self, path: impl Into<String>, value: impl Into<Field>) -> Self {
        self.changes.push(FieldChange {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    /// Encodes the request as JSON bytes.
    ///
    /// # Errors
    /// `SerializationFailed` if encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>, TransportError> {
        serde_json::to_vec(self).map_err(|e| TransportError::SerializationFailed {
            message: e.to_string(),
        })
    }
}

/// A service hosting named records.
pub trait RecordService: Send + Sync {
    /// Binds to the named record.
    fn connect(&self, name: &str) -> Result<(), ChannelUnavailableError>;

    /// Plain read of the record's full current state.
    fn get(&self, name: &str) -> Result<Structure, TransportError>;

    /// Applies `request` atomically and returns the resulting full state.
    fn put_get(&self, request: &PutRequest) -> Result<Structure, TransportError>;

    /// Names of the hosted records, for diagnostics.
    fn record_names(&self) -> Vec<String>;
}
