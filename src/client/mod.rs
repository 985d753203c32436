//! Client side of the record service: channels and put/get transactions.

mod putget;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{ChannelUnavailableError, TransportError};
use crate::field::Structure;
use crate::service::RecordService;

pub use putget::{PutData, PutGet};

/// Entry point for opening channels against one record service.
#[derive(Clone)]
pub struct Client {
    service: Arc<dyn RecordService>,
}

impl Client {
    pub fn new(service: Arc<dyn RecordService>) -> Self {
        Self { service }
    }

    /// Binds a channel to the named record.
    ///
    /// # Errors
    /// `ChannelUnavailableError` if the record is absent or unreachable.
    pub fn channel(&self, name: &str) -> Result<Channel, ChannelUnavailableError> {
        match self.service.connect(name) {
            Ok(()) => {
                info!(channel = name, "channel connected");
                Ok(Channel {
                    name: name.to_string(),
                    service: Arc::clone(&self.service),
                })
            }
            Err(e) => {
                warn!(channel = name, error = %e, "channel connect failed");
                Err(e)
            }
        }
    }

    /// Names of the records the service hosts.
    #[must_use]
    pub fn record_names(&self) -> Vec<String> {
        self.service.record_names()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

/// A handle bound to exactly one record.
#[derive(Clone)]
pub struct Channel {
    name: String,
    service: Arc<dyn RecordService>,
}

impl Channel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plain read of the record's current state.
    ///
    /// # Errors
    /// `TransportError` on server or network failure.
    pub fn get(&self) -> Result<Structure, TransportError> {
        debug!(channel = %self.name, "get");
        self.service.get(&self.name)
    }

    /// Opens a put/get transaction on this channel.
    ///
    /// # Errors
    /// See [`PutGet::open`].
    pub fn create_put_get(&self) -> crate::error::DemoResult<PutGet> {
        PutGet::open(self)
    }

    pub(crate) fn service(&self) -> &dyn RecordService {
        self.service.as_ref()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::InMemoryRecordService;

    fn client() -> Client {
        Client::new(Arc::new(InMemoryRecordService::with_standard_database()))
    }

    #[test]
    fn test_channel_connects() {
        let ch = client().channel("double").unwrap();
        assert_eq!(ch.name(), "double");
        assert_eq!(ch.get().unwrap().get::<f64>("value").unwrap(), 0.0);
    }

    #[test]
    fn test_channel_unavailable() {
        let err = client().channel("missing").unwrap_err();
        assert_eq!(err.name, "missing");
    }

    #[test]
    fn test_record_names() {
        assert!(client().record_names().contains(&"table".to_string()));
    }
}
