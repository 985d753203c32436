//! Channel-name routing: registry of verifiers plus the dispatcher.
//!
//! The registry is built once, explicitly, and is immutable afterwards.
//! The reserved aggregate name never reaches it; the dispatcher routes
//! that name straight to the [`MultiChannelAggregator`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::client::Client;
use crate::config::DemoConfig;
use crate::error::{DemoResult, UnrecognizedChannelError};
use crate::value::ScalarType;
use crate::verify::{
    AttributeVerifier, EnumVerifier, MatrixVerifier, MultiChannelAggregator, NameValueVerifier,
    ScalarArrayVerifier, ScalarVerifier, TableVerifier, UriVerifier, Verification, Verifier,
};

/// Immutable channel-name to verifier mapping.
pub struct Registry {
    verifiers: BTreeMap<String, Box<dyn Verifier>>,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Verifiers for every record in [`crate::nt::standard_database`]
    /// except the aggregate.
    #[must_use]
    pub fn standard() -> Self {
        let scalars = [
            ("string", "stringArray", ScalarType::String),
            ("short", "shortArray", ScalarType::Short),
            ("int", "intArray", ScalarType::Int),
            ("long", "longArray", ScalarType::Long),
            ("double", "doubleArray", ScalarType::Double),
        ];
        let builder = scalars
            .into_iter()
            .fold(Self::builder(), |b, (scalar, array, ty)| {
                b.register(scalar, ScalarVerifier::for_type(ty))
                    .register(array, ScalarArrayVerifier::for_type(ty))
            });
        builder
            .register("enum", EnumVerifier)
            .register("matrix", MatrixVerifier::default())
            .register("uri", UriVerifier::default())
            .register("name_value", NameValueVerifier::default())
            .register("table", TableVerifier::default())
            .register("attribute", AttributeVerifier::default())
            .build()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Verifier> {
        self.verifiers.get(name).map(|v| &**v)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.verifiers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.verifiers.iter().map(|(k, v)| (k, v.schema())))
            .finish()
    }
}

/// Builder for [`Registry`]. A later registration under the same name
/// replaces the earlier one.
#[derive(Default)]
pub struct RegistryBuilder {
    verifiers: BTreeMap<String, Box<dyn Verifier>>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn register(mut self, name: impl Into<String>, verifier: impl Verifier + 'static) -> Self {
        self.verifiers.insert(name.into(), Box::new(verifier));
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            verifiers: self.verifiers,
        }
    }
}

/// Result of one `demo` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoOutcome {
    pub channel: String,
    pub success: bool,
    /// Failure reasons, or the full transcript when verbose.
    pub diagnostics: String,
}

impl fmt::Display for DemoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.success {
            "successful"
        } else {
            "unsuccessful"
        };
        write!(f, "{} record demo {verdict}", self.channel)
    }
}

/// Routes channel names to verifiers and reports one outcome per call.
#[derive(Debug)]
pub struct Dispatcher {
    client: Client,
    registry: Registry,
    multi_channel: String,
    aggregator: MultiChannelAggregator,
}

impl Dispatcher {
    pub fn new(client: Client, registry: Registry, config: &DemoConfig) -> Self {
        Self {
            client,
            registry,
            multi_channel: config.multi_channel.clone(),
            aggregator: MultiChannelAggregator::new(config.auxiliary_channels.iter().cloned()),
        }
    }

    /// Runs one write/read/verify pass for `name`.
    ///
    /// Never fails: every error kind becomes an unsuccessful outcome with
    /// the error in `diagnostics`. Failure reasons are always reported;
    /// `verbose` swaps them for the full transcript, which contains them.
    pub fn demo(&self, name: &str, verbose: bool) -> DemoOutcome {
        let mut diagnostics = String::new();
        let success = match self.try_demo(name) {
            Ok(v) => {
                if verbose {
                    diagnostics.push_str(v.transcript());
                }
                if !verbose {
                    for reason in v.failures() {
                        diagnostics.push_str(reason);
                        diagnostics.push('\n');
                    }
                }
                if !v.success() && v.failures().is_empty() {
                    diagnostics.push_str("values read back differ from values written\n");
                }
                v.success()
            }
            Err(e) => {
                warn!(channel = name, error = %e, "demo failed");
                diagnostics.push_str(&e.to_string());
                diagnostics.push('\n');
                false
            }
        };
        info!(channel = name, success, "demo finished");
        DemoOutcome {
            channel: name.to_string(),
            success,
            diagnostics,
        }
    }

    fn try_demo(&self, name: &str) -> DemoResult<Verification> {
        if name == self.multi_channel {
            debug!(channel = name, "routing to aggregator");
            return self.aggregator.run(&self.client, name);
        }
        let verifier = self
            .registry
            .get(name)
            .ok_or_else(|| UnrecognizedChannelError {
                name: name.to_string(),
            })?;
        let channel = self.client.channel(name)?;
        debug!(channel = name, schema = verifier.schema(), "running verifier");
        verifier.run(&channel)
    }

    /// Every name `demo` accepts: the registry's plus the aggregate name.
    #[must_use]
    pub fn channel_names(&self) -> Vec<String> {
        self.registry
            .names()
            .map(str::to_string)
            .chain(std::iter::once(self.multi_channel.clone()))
            .collect()
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }
}
