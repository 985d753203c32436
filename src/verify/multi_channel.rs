//! Fan-out verifier for the NTMultiChannel aggregate record.

use tracing::{debug, warn};

use crate::client::Client;
use crate::error::DemoResult;
use crate::field::UnionValue;

use super::{compare_slices, Verification};

/// One auxiliary channel's contribution to the aggregate.
#[derive(Debug, Clone, PartialEq)]
struct Sample {
    name: String,
    value: UnionValue,
    connected: bool,
}

/// Reads each auxiliary channel once and writes the three parallel arrays
/// `channelName`, `value` (union[]) and `isConnected` into the target.
///
/// A pass requires every auxiliary channel to have connected and the
/// written arrays to read back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiChannelAggregator {
    auxiliary: Vec<String>,
}

impl MultiChannelAggregator {
    pub fn new<I, S>(auxiliary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            auxiliary: auxiliary.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn auxiliary(&self) -> &[String] {
        &self.auxiliary
    }

    /// Never fails; an unreachable channel is sampled as disconnected.
    fn sample(client: &Client, name: &str) -> Sample {
        let read = client
            .channel(name)
            .map_err(|e| e.to_string())
            .and_then(|ch| ch.get().map_err(|e| e.to_string()));
        match read {
            Ok(state) => {
                let value = state
                    .scalar("value")
                    .map_or_else(|_| UnionValue::new(), |s| UnionValue::of(s.clone()));
                debug!(channel = name, %value, "auxiliary sampled");
                Sample {
                    name: name.to_string(),
                    value,
                    connected: true,
                }
            }
            Err(reason) => {
                warn!(channel = name, %reason, "auxiliary channel unavailable");
                Sample {
                    name: name.to_string(),
                    value: UnionValue::new(),
                    connected: false,
                }
            }
        }
    }

    /// Runs the aggregate pass against the record named `target`.
    ///
    /// # Errors
    /// `ChannelUnavailable` if the target itself cannot be bound,
    /// `Transport` or `FieldAccess` if its transaction fails.
    pub fn run(&self, client: &Client, target: &str) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let channel = client.channel(target)?;

        let samples: Vec<Sample> = self
            .auxiliary
            .iter()
            .map(|name| Self::sample(client, name))
            .collect();
        let names: Vec<String> = samples.iter().map(|s| s.name.clone()).collect();
        let values: Vec<UnionValue> = samples.iter().map(|s| s.value.clone()).collect();
        let connected: Vec<bool> = samples.iter().map(|s| s.connected).collect();

        let mut put_get = channel.create_put_get()?;
        let put = put_get.put_data_mut();
        put.replace("channelName", names.clone())?;
        put.replace_unions("value", values.clone())?;
        put.replace("isConnected", connected.clone())?;
        put_get.execute()?;

        let read = put_get.get_data();
        compare_slices(&mut v, "channelName", &names, read.view::<String>("channelName")?);
        compare_slices(&mut v, "value", &values, read.union_array("value")?);
        compare_slices(&mut v, "isConnected", &connected, read.view::<bool>("isConnected")?);

        let down: Vec<&str> = samples
            .iter()
            .filter(|s| !s.connected)
            .map(|s| s.name.as_str())
            .collect();
        if !down.is_empty() {
            v.fail(format!("\tnot connected: {}", down.join(", ")));
        }
        Ok(v)
    }
}
