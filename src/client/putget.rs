//! Combined write-then-read transactions.

use tracing::{debug, warn};

use crate::client::Channel;
use crate::error::{DemoResult, FieldAccessError};
use crate::field::{Field, Structure, UnionValue};
use crate::service::PutRequest;
use crate::value::{Scalar, ScalarValue};

/// The put-side value tree of a transaction.
///
/// Every write is recorded; only recorded leaves are sent on execute.
#[derive(Debug, Clone)]
pub struct PutData {
    structure: Structure,
    changed: Vec<String>,
}

impl PutData {
    fn new(structure: Structure) -> Self {
        Self {
            structure,
            changed: Vec::new(),
        }
    }

    /// Read access to the put-side tree.
    #[must_use]
    pub const fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Writes a scalar leaf.
    ///
    /// # Errors
    /// See [`Structure::put`].
    pub fn put<T: ScalarValue>(&mut self, path: &str, value: T) -> Result<(), FieldAccessError> {
        self.structure.put(path, value)?;
        self.mark(path);
        Ok(())
    }

    /// Overwrites any leaf with a value of the same kind.
    ///
    /// # Errors
    /// See [`Structure::set_field`].
    pub fn set_field(&mut self, path: &str, value: Field) -> Result<(), FieldAccessError> {
        self.structure.set_field(path, value)?;
        self.mark(path);
        Ok(())
    }

    /// Replaces an array leaf; `values` is consumed.
    ///
    /// # Errors
    /// See [`Structure::replace`].
    pub fn replace<T: ScalarValue>(
        &mut self,
        path: &str,
        values: Vec<T>,
    ) -> Result<(), FieldAccessError> {
        self.structure.replace(path, values)?;
        self.mark(path);
        Ok(())
    }

    /// Selects `value` in a union leaf.
    ///
    /// # Errors
    /// See [`Structure::union_mut`].
    pub fn set_union(
        &mut self,
        path: &str,
        value: impl Into<Scalar>,
    ) -> Result<(), FieldAccessError> {
        self.structure.union_mut(path)?.set(value);
        self.mark(path);
        Ok(())
    }

    /// Replaces a union array leaf; `values` is consumed.
    ///
    /// # Errors
    /// See [`Structure::replace_unions`].
    pub fn replace_unions(
        &mut self,
        path: &str,
        values: Vec<UnionValue>,
    ) -> Result<(), FieldAccessError> {
        self.structure.replace_unions(path, values)?;
        self.mark(path);
        Ok(())
    }

    /// Paths written so far, in first-write order.
    #[must_use]
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    #[must_use]
    pub fn is_changed(&self, path: &str) -> bool {
        self.changed.iter().any(|p| p == path)
    }

    fn mark(&mut self, path: &str) {
        if !self.is_changed(path) {
            self.changed.push(path.to_string());
        }
    }

    fn to_request(&self, channel: &str) -> Result<PutRequest, FieldAccessError> {
        self.changed
            .iter()
            .try_fold(PutRequest::new(channel), |req, path| {
                Ok(req.with_change(path.clone(), self.structure.sub_field(path)?.clone()))
            })
    }
}

/// One channel's put/get transaction.
///
/// Holds a put-side tree seeded from the record's state at open time and
/// a get-side tree refreshed by every [`PutGet::execute`].
#[derive(Debug)]
pub struct PutGet {
    channel: Channel,
    put: PutData,
    get: Structure,
}

impl PutGet {
    /// Opens a transaction bound to `channel`.
    ///
    /// Costs one plain get on top of the bind: the put side is seeded with
    /// the record's current state so callers can read before they write
    /// (the enum pass needs the current index and choices).
    ///
    /// # Errors
    /// `ChannelUnavailable` if the channel no longer binds, `Transport` if
    /// the initial state cannot be read.
    pub fn open(channel: &Channel) -> DemoResult<Self> {
        channel.service().connect(channel.name())?;
        let seed = channel.get()?;
        debug!(channel = channel.name(), type_id = seed.type_id(), "put/get opened");
        Ok(Self {
            channel: channel.clone(),
            put: PutData::new(seed.clone()),
            get: seed,
        })
    }

    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    #[must_use]
    pub const fn put_data(&self) -> &PutData {
        &self.put
    }

    pub fn put_data_mut(&mut self) -> &mut PutData {
        &mut self.put
    }

    /// The server state returned by the last execute (the opening state
    /// before the first one).
    #[must_use]
    pub const fn get_data(&self) -> &Structure {
        &self.get
    }

    /// Sends the populated put fields and refreshes the get-side tree.
    ///
    /// May be called repeatedly; each call re-sends every populated field.
    ///
    /// # Errors
    /// `FieldAccess` if a changed path no longer resolves locally,
    /// `Transport` on any server or network failure. Nothing is retried
    /// here.
    pub fn execute(&mut self) -> DemoResult<&Structure> {
        let request = self.put.to_request(self.channel.name())?;
        debug!(
            request_id = %request.request_id,
            channel = self.channel.name(),
            fields = ?self.put.changed(),
            "put/get execute"
        );
        match self.channel.service().put_get(&request) {
            Ok(state) => {
                self.get = state;
                Ok(&self.get)
            }
            Err(e) => {
                warn!(request_id = %request.request_id, channel = self.channel.name(), error = %e, "put/get failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::Client;
    use crate::error::{DemoError, TransportError};
    use crate::service::InMemoryRecordService;

    fn open(name: &str) -> (Arc<InMemoryRecordService>, PutGet) {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let client = Client::new(svc.clone());
        let pg = client.channel(name).unwrap().create_put_get().unwrap();
        (svc, pg)
    }

    #[test]
    fn test_only_populated_fields_are_changed() {
        let (_svc, mut pg) = open("uri");
        assert!(pg.put_data().changed().is_empty());
        pg.put_data_mut().put("scheme", "pva".to_string()).unwrap();
        pg.put_data_mut().put("scheme", "ca".to_string()).unwrap();
        pg.put_data_mut().put("query.query", "q".to_string()).unwrap();
        assert_eq!(pg.put_data().changed(), ["scheme", "query.query"]);
        assert!(!pg.put_data().is_changed("path"));
    }

    #[test]
    fn test_execute_refreshes_get_side() {
        let (_svc, mut pg) = open("matrix");
        pg.put_data_mut().replace("dim", vec![1i32, 2]).unwrap();
        pg.put_data_mut().replace("value", vec![1.0f64, 2.0]).unwrap();
        let got = pg.execute().unwrap();
        assert_eq!(got.view::<i32>("dim").unwrap(), &[1, 2]);
        assert_eq!(pg.get_data().view::<f64>("value").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_execute_is_repeatable() {
        let (svc, mut pg) = open("int");
        pg.put_data_mut().put("value", 5i32).unwrap();
        pg.execute().unwrap();

        // Another writer changes the record; re-executing re-sends our put.
        crate::service::RecordService::put_get(
            svc.as_ref(),
            &PutRequest::new("int").with_change("value", Scalar::Int(9)),
        )
        .unwrap();
        assert_eq!(pg.execute().unwrap().get::<i32>("value").unwrap(), 5);
    }

    #[test]
    fn test_failed_write_is_not_recorded() {
        let (_svc, mut pg) = open("int");
        assert!(pg.put_data_mut().put("value", 1.0f64).is_err());
        assert!(pg.put_data().changed().is_empty());
    }

    #[test]
    fn test_open_fails_when_record_removed() {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let client = Client::new(svc.clone());
        let ch = client.channel("long").unwrap();
        svc.remove("long").unwrap();
        let err = ch.create_put_get().unwrap_err();
        assert!(matches!(err, DemoError::ChannelUnavailable(_)));
    }

    #[test]
    fn test_execute_fails_when_record_removed() {
        let (svc, mut pg) = open("long");
        svc.remove("long").unwrap();
        let err = pg.execute().unwrap_err();
        assert!(matches!(
            err,
            DemoError::Transport(TransportError::ConnectionLost { .. })
        ));
    }

    #[test]
    fn test_unresolvable_change_is_field_error() {
        let (_svc, mut pg) = open("long");
        pg.put.changed.push("nope".to_string());
        let err = pg.execute().unwrap_err();
        assert!(err.is_field_access());
        assert!(!err.is_transport());
    }
}
