use crate::client::Channel;
use crate::error::DemoResult;
use crate::nt::NT_ATTRIBUTE;
use crate::value::Scalar;

use super::{compare_value, Verification, Verifier};

/// NTAttribute: writes `name` and selects one concrete kind in the `value`
/// union, then reads the union back as that same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeVerifier {
    name: String,
    value: Scalar,
}

impl Default for AttributeVerifier {
    fn default() -> Self {
        Self::new("The ultimate answer", Scalar::from("42"))
    }
}

impl AttributeVerifier {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Verifier for AttributeVerifier {
    fn schema(&self) -> &'static str {
        NT_ATTRIBUTE
    }

    fn run(&self, channel: &Channel) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let mut put_get = channel.create_put_get()?;

        put_get.put_data_mut().put("name", self.name.clone())?;
        put_get.put_data_mut().set_union("value", self.value.clone())?;
        put_get.execute()?;

        let read = put_get.get_data();
        let name = read.get::<String>("name")?;
        let value = read
            .union("value")?
            .get_as(self.value.scalar_type())
            .map_err(|e| e.at("value"))?;

        compare_value(&mut v, "name", self.name.as_str(), name.as_str());
        compare_value(&mut v, "value", &self.value, &value);
        v.line(format!("\t      value kind: {}", value.scalar_type()));
        Ok(v)
    }
}
