use crate::client::Channel;
use crate::error::DemoResult;
use crate::nt::NT_URI;

use super::{compare_value, Verification, Verifier};

/// NTURI: writes `scheme`, `path` and the nested `query.query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriVerifier {
    scheme: String,
    path: String,
    query: String,
}

impl Default for UriVerifier {
    fn default() -> Self {
        Self::new("URI scheme string", "URI path string", "URI query string")
    }
}

impl UriVerifier {
    #[must_use]
    pub fn new(
        scheme: impl Into<String>,
        path: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            path: path.into(),
            query: query.into(),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("scheme", self.scheme.as_str()),
            ("path", self.path.as_str()),
            ("query.query", self.query.as_str()),
        ]
    }
}

impl Verifier for UriVerifier {
    fn schema(&self) -> &'static str {
        NT_URI
    }

    fn run(&self, channel: &Channel) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let mut put_get = channel.create_put_get()?;

        for (path, value) in self.fields() {
            put_get.put_data_mut().put(path, value.to_string())?;
        }
        put_get.execute()?;

        let read = put_get.get_data();
        for (path, expected) in self.fields() {
            let actual = read.get::<String>(path)?;
            compare_value(&mut v, path, expected, actual.as_str());
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::Client;
    use crate::service::{InMemoryRecordService, RecordService};

    #[test]
    fn test_uri_round_trip() {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let ch = Client::new(svc.clone()).channel("uri").unwrap();
        let v = UriVerifier::default().run(&ch).unwrap();
        assert!(v.success(), "{}", v.transcript());

        let stored = svc.get("uri").unwrap();
        assert_eq!(stored.get::<String>("scheme").unwrap(), "URI scheme string");
        assert_eq!(stored.get::<String>("query.query").unwrap(), "URI query string");
        // Never populated, so never sent.
        assert_eq!(stored.get::<String>("authority").unwrap(), "");
    }

    #[test]
    fn test_uri_against_scalar_record_is_field_error() {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let ch = Client::new(svc).channel("string").unwrap();
        let err = UriVerifier::default().run(&ch).unwrap_err();
        assert!(err.is_field_access());
    }
}
