use crate::client::Channel;
use crate::error::DemoResult;
use crate::nt::NT_NAME_VALUE;

use super::{compare_slices, Verification, Verifier};

/// NTNameValue: writes the paired `name` and `value` arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct NameValueVerifier {
    names: Vec<String>,
    values: Vec<f64>,
}

impl Default for NameValueVerifier {
    fn default() -> Self {
        Self::from_pairs([("one", 1.0), ("two", 2.0), ("three", 3.0)])
    }
}

impl NameValueVerifier {
    /// Builds the two arrays from pairs, so their lengths always agree.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let (names, values) = pairs.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        Self { names, values }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Verifier for NameValueVerifier {
    fn schema(&self) -> &'static str {
        NT_NAME_VALUE
    }

    fn run(&self, channel: &Channel) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let mut put_get = channel.create_put_get()?;

        put_get.put_data_mut().replace("name", self.names.clone())?;
        put_get.put_data_mut().replace("value", self.values.clone())?;
        put_get.execute()?;

        let read = put_get.get_data();
        let names = read.view::<String>("name")?;
        let values = read.view::<f64>("value")?;
        compare_slices(&mut v, "name", &self.names, names);
        compare_slices(&mut v, "value", &self.values, values);
        if names.len() != values.len() {
            v.fail(format!(
                "\tname/value pairing broken: {} names, {} values",
                names.len(),
                values.len()
            ));
        }
        Ok(v)
    }
}
