use crate::client::Channel;
use crate::error::DemoResult;
use crate::field::Field;
use crate::nt::{NT_SCALAR, NT_SCALAR_ARRAY};
use crate::value::{Scalar, ScalarArray, ScalarType};

use super::{compare_value, Verification, Verifier};

/// NTScalar: writes `value` and reads it back.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarVerifier {
    value: Scalar,
}

impl ScalarVerifier {
    #[must_use]
    pub fn new(value: impl Into<Scalar>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Fixed demo literal for `scalar_type`.
    #[must_use]
    pub fn for_type(scalar_type: ScalarType) -> Self {
        let value = match scalar_type {
            ScalarType::Boolean => Scalar::Boolean(true),
            ScalarType::Short => Scalar::Short(42),
            ScalarType::Int => Scalar::Int(42_000),
            ScalarType::Long => Scalar::Long(42_000_000_000),
            ScalarType::Double => Scalar::Double(4.2),
            ScalarType::String => Scalar::from("The answer is 42"),
        };
        Self { value }
    }
}

impl Verifier for ScalarVerifier {
    fn schema(&self) -> &'static str {
        NT_SCALAR
    }

    fn run(&self, channel: &Channel) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let mut put_get = channel.create_put_get()?;

        let before = put_get.put_data().structure().scalar("value")?.clone();
        put_get
            .put_data_mut()
            .set_field("value", Field::Scalar(self.value.clone()))?;
        put_get.execute()?;

        let after = put_get.get_data().scalar("value")?;
        v.line(format!("\tBefore write: {before}"));
        compare_value(&mut v, "value", &self.value, after);
        Ok(v)
    }
}

/// NTScalarArray: replaces `value` and reads it back element-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarArrayVerifier {
    values: ScalarArray,
}

impl ScalarArrayVerifier {
    #[must_use]
    pub fn new(values: impl Into<ScalarArray>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Fixed demo literals for arrays of `element_type`.
    #[must_use]
    pub fn for_type(element_type: ScalarType) -> Self {
        let values = match element_type {
            ScalarType::Boolean => ScalarArray::from(vec![true, false, true]),
            ScalarType::Short => ScalarArray::from(vec![1i16, 2, 3, 4]),
            ScalarType::Int => ScalarArray::from(vec![10i32, 20, 30, 40, 50]),
            ScalarType::Long => ScalarArray::from(vec![-1i64, 0, 1, i64::MAX]),
            ScalarType::Double => ScalarArray::from(vec![0.5f64, 1.5, 2.5]),
            ScalarType::String => ScalarArray::from(vec!["one", "two", "three"]),
        };
        Self { values }
    }
}

impl Verifier for ScalarArrayVerifier {
    fn schema(&self) -> &'static str {
        NT_SCALAR_ARRAY
    }

    fn run(&self, channel: &Channel) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let mut put_get = channel.create_put_get()?;

        put_get
            .put_data_mut()
            .set_field("value", Field::ScalarArray(self.values.clone()))?;
        put_get.execute()?;

        let after = put_get.get_data().scalar_array("value")?;
        if after.len() == self.values.len() {
            compare_value(&mut v, "value", &self.values, after);
        } else {
            v.line(format!("\t{:>16}: {after}", "value"));
            v.fail(format!(
                "\t{:>16}  length mismatch: wrote {}, read {}",
                "value",
                self.values.len(),
                after.len()
            ));
        }
        Ok(v)
    }
}
