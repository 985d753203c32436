//! # ntverify - round-trip verification of normative type records
//!
//! A record service hosts named records, each shaped by a normative type
//! (NTEnum, NTMatrix, NTURI, ...). This crate opens a channel to a record,
//! writes a chosen subset of its fields in one put/get transaction, reads
//! the server's resulting state back and checks that every written value
//! survived the round trip.
//!
//! ## Core Concepts
//!
//! - **Structure**: a record's value tree, addressed by dotted field paths
//! - **PutGet**: one "apply these writes, return the full state" exchange
//! - **Verifier**: a schema-specific write/read/compare pass
//! - **Dispatcher**: routes a channel name to its verifier
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ntverify::{Client, DemoConfig, Dispatcher, InMemoryRecordService, Registry};
//!
//! let service = Arc::new(InMemoryRecordService::with_standard_database());
//! let dispatcher = Dispatcher::new(
//!     Client::new(service),
//!     Registry::standard(),
//!     &DemoConfig::default(),
//! );
//!
//! let outcome = dispatcher.demo("enum", false);
//! assert!(outcome.success);
//! assert_eq!(outcome.to_string(), "enum record demo successful");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Values and field access
pub mod error;
pub mod field;
pub mod nt;
pub mod value;

// Record service and client
pub mod client;
pub mod service;

// Verification
pub mod config;
pub mod dispatch;
pub mod verify;

pub use client::{Channel, Client, PutData, PutGet};
pub use config::{DemoConfig, AUXILIARY_CHANNELS, MULTI_CHANNEL_NAME};
pub use dispatch::{DemoOutcome, Dispatcher, Registry, RegistryBuilder};
pub use error::{
    ChannelUnavailableError, ConfigError, DemoError, DemoResult, FieldAccessError, TransportError,
    UnrecognizedChannelError,
};
pub use field::{Enumerated, Field, FieldPath, Structure, UnionValue};
pub use service::{FieldChange, InMemoryRecordService, PutRequest, RecordService};
pub use value::{Scalar, ScalarArray, ScalarType, ScalarValue};
pub use verify::{
    AttributeVerifier, EnumVerifier, MatrixVerifier, MultiChannelAggregator, NameValueVerifier,
    ScalarArrayVerifier, ScalarVerifier, TableVerifier, UriVerifier, Verification, Verifier,
};
