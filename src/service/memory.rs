//! In-memory record host.
//!
//! Thread-safe; records live behind one `RwLock`. Requests are passed
//! through their JSON encoding before being applied so that nothing the
//! client holds is shared with the hosted state.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{ChannelUnavailableError, TransportError};
use crate::field::{Field, Structure, ENUM_TYPE_ID};
use crate::nt::{standard_database, TIME_STAMP_TYPE_ID};
use crate::service::traits::{PutRequest, RecordService};

fn lock_err(context: &'static str) -> TransportError {
    TransportError::ServerError {
        code: 500,
        message: format!("poisoned lock: {context}"),
    }
}

fn rejected(channel: &str, reason: impl Into<String>) -> TransportError {
    TransportError::Rejected {
        channel: channel.to_string(),
        reason: reason.into(),
    }
}

/// Checks every enumerated sub-structure has an index inside its choices.
fn validate_enums(structure: &Structure, prefix: &str) -> Result<(), String> {
    if structure.type_id() == ENUM_TYPE_ID {
        let index = structure.get::<i32>("index").map_err(|e| e.to_string())?;
        let choices = structure
            .view::<String>("choices")
            .map_err(|e| e.to_string())?;
        let in_range = usize::try_from(index).is_ok_and(|i| i < choices.len());
        if !in_range {
            return Err(format!(
                "{prefix}.index {index} out of range for {} choices",
                choices.len()
            ));
        }
    }
    for (name, field) in structure.fields() {
        if let Field::Structure(child) = field {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}.{name}")
            };
            validate_enums(child, &path)?;
        }
    }
    Ok(())
}

fn stamp(structure: &mut Structure) -> Result<(), TransportError> {
    let Some(Field::Structure(ts)) = structure.field_mut("timeStamp") else {
        return Ok(());
    };
    if ts.type_id() != TIME_STAMP_TYPE_ID {
        return Ok(());
    }
    let now = Utc::now();
    let nanos = i32::try_from(now.timestamp_subsec_nanos()).unwrap_or_default();
    ts.put("secondsPastEpoch", now.timestamp())
        .and_then(|()| ts.put("nanoseconds", nanos))
        .map_err(|e| TransportError::ServerError {
            code: 500,
            message: format!("malformed timeStamp: {e}"),
        })
}

/// Thread-safe in-memory record host.
#[derive(Debug, Default)]
pub struct InMemoryRecordService {
    records: RwLock<BTreeMap<String, Structure>>,
}

impl InMemoryRecordService {
    /// Create a host with no records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host serving [`standard_database`].
    #[must_use]
    pub fn with_standard_database() -> Self {
        Self {
            records: RwLock::new(standard_database().into_iter().collect()),
        }
    }

    /// Hosts `record` under `name`, returning whatever was hosted there before.
    ///
    /// # Errors
    /// `ServerError` if the record map lock is poisoned.
    pub fn host(
        &self,
        name: impl Into<String>,
        record: Structure,
    ) -> Result<Option<Structure>, TransportError> {
        let mut records = self.records.write().map_err(|_| lock_err("host"))?;
        Ok(records.insert(name.into(), record))
    }

    /// Stops hosting `name`.
    ///
    /// # Errors
    /// `ServerError` if the record map lock is poisoned.
    pub fn remove(&self, name: &str) -> Result<Option<Structure>, TransportError> {
        let mut records = self.records.write().map_err(|_| lock_err("remove"))?;
        Ok(records.remove(name))
    }
}

impl RecordService for InMemoryRecordService {
    fn connect(&self, name: &str) -> Result<(), ChannelUnavailableError> {
        let records = self
            .records
            .read()
            .map_err(|_| ChannelUnavailableError::new(name, "poisoned lock: connect"))?;
        if records.contains_key(name) {
            Ok(())
        } else {
            Err(ChannelUnavailableError::new(name, "no such record"))
        }
    }

    fn get(&self, name: &str) -> Result<Structure, TransportError> {
        let records = self.records.read().map_err(|_| lock_err("get"))?;
        records
            .get(name)
            .cloned()
            .ok_or_else(|| TransportError::ConnectionLost {
                channel: name.to_string(),
                message: "record no longer hosted".to_string(),
            })
    }

    fn put_get(&self, request: &PutRequest) -> Result<Structure, TransportError> {
        let wire = request.to_json()?;
        let request: PutRequest =
            serde_json::from_slice(&wire).map_err(|e| TransportError::ServerError {
                code: 400,
                message: format!("undecodable request: {e}"),
            })?;
        let channel = request.channel.as_str();

        let mut records = self.records.write().map_err(|_| lock_err("put_get"))?;
        let current = records
            .get(channel)
            .ok_or_else(|| TransportError::ConnectionLost {
                channel: channel.to_string(),
                message: "record no longer hosted".to_string(),
            })?;

        // Changes land on a copy; the hosted record is swapped only if all apply.
        let mut next = current.clone();
        for change in &request.changes {
            if let Err(e) = next.set_field(&change.path, change.value.clone()) {
                warn!(request_id = %request.request_id, channel, error = %e, "put rejected");
                return Err(rejected(channel, e.to_string()));
            }
        }
        if let Err(reason) = validate_enums(&next, "") {
            warn!(request_id = %request.request_id, channel, %reason, "put rejected");
            return Err(rejected(channel, reason));
        }
        stamp(&mut next)?;

        debug!(
            request_id = %request.request_id,
            channel,
            changes = request.changes.len(),
            bytes = wire.len(),
            "put applied"
        );
        records.insert(channel.to_string(), next.clone());
        Ok(next)
    }

    fn record_names(&self) -> Vec<String> {
        self.records
            .read()
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default()
    }
}
