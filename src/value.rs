//! Scalar and array values held at record leaves.
//!
//! Records are built from a small closed set of scalar kinds. Every leaf is
//! either one scalar, a homogeneous array of one scalar kind, or a union
//! slot holding one scalar at a time (see [`crate::field::UnionValue`]).

use serde::{Deserialize, Serialize};

/// The concrete scalar kinds a record leaf can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Boolean,
    Short,
    Int,
    Long,
    Double,
    String,
}

impl ScalarType {
    /// Returns the type name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single scalar value.
///
/// # Examples
///
/// ```
/// use ntverify::{Scalar, ScalarType};
///
/// let v = Scalar::from(42i64);
/// assert_eq!(v.scalar_type(), ScalarType::Long);
/// assert_eq!(v.as_long(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Boolean(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
}

impl Scalar {
    /// Zero value for the given kind.
    #[must_use]
    pub fn default_for(scalar_type: ScalarType) -> Self {
        match scalar_type {
            ScalarType::Boolean => Self::Boolean(false),
            ScalarType::Short => Self::Short(0),
            ScalarType::Int => Self::Int(0),
            ScalarType::Long => Self::Long(0),
            ScalarType::Double => Self::Double(0.0),
            ScalarType::String => Self::String(String::new()),
        }
    }

    /// Kind of this value.
    #[must_use]
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Boolean(_) => ScalarType::Boolean,
            Self::Short(_) => ScalarType::Short,
            Self::Int(_) => ScalarType::Int,
            Self::Long(_) => ScalarType::Long,
            Self::Double(_) => ScalarType::Double,
            Self::String(_) => ScalarType::String,
        }
    }

    /// The value if this is a `boolean`.
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// The value if this is a `short`.
    #[must_use]
    pub const fn as_short(&self) -> Option<i16> {
        match self {
            Self::Short(v) => Some(*v),
            _ => None,
        }
    }

    /// The value if this is a `int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The value if this is a `long`.
    #[must_use]
    pub const fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// The value if this is a `double`.
    #[must_use]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// The value if this is a `string`.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

/// A homogeneous, order-significant array of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScalarArray {
    Boolean(Vec<bool>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Double(Vec<f64>),
    String(Vec<String>),
}

impl ScalarArray {
    /// Empty array of the given element kind.
    #[must_use]
    pub const fn empty(element_type: ScalarType) -> Self {
        match element_type {
            ScalarType::Boolean => Self::Boolean(Vec::new()),
            ScalarType::Short => Self::Short(Vec::new()),
            ScalarType::Int => Self::Int(Vec::new()),
            ScalarType::Long => Self::Long(Vec::new()),
            ScalarType::Double => Self::Double(Vec::new()),
            ScalarType::String => Self::String(Vec::new()),
        }
    }

    #[must_use]
    pub const fn element_type(&self) -> ScalarType {
        match self {
            Self::Boolean(_) => ScalarType::Boolean,
            Self::Short(_) => ScalarType::Short,
            Self::Int(_) => ScalarType::Int,
            Self::Long(_) => ScalarType::Long,
            Self::Double(_) => ScalarType::Double,
            Self::String(_) => ScalarType::String,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Boolean(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` as a scalar.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Scalar> {
        match self {
            Self::Boolean(v) => v.get(index).map(|x| Scalar::Boolean(*x)),
            Self::Short(v) => v.get(index).map(|x| Scalar::Short(*x)),
            Self::Int(v) => v.get(index).map(|x| Scalar::Int(*x)),
            Self::Long(v) => v.get(index).map(|x| Scalar::Long(*x)),
            Self::Double(v) => v.get(index).map(|x| Scalar::Double(*x)),
            Self::String(v) => v.get(index).map(|x| Scalar::String(x.clone())),
        }
    }

    /// Iterates the elements as scalars.
    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

impl std::fmt::Display for ScalarArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

/// Rust types that map one-to-one onto a [`ScalarType`].
///
/// This is what lets the field accessor hand out typed leaves
/// (`structure.get::<i32>("value.index")`) instead of raw [`Scalar`]s.
pub trait ScalarValue: Sized + Clone + PartialEq + std::fmt::Debug {
    /// The kind this Rust type corresponds to.
    const TYPE: ScalarType;

    /// Borrow the value out of a scalar of the matching kind.
    fn from_scalar(scalar: &Scalar) -> Option<&Self>;

    fn into_scalar(self) -> Scalar;

    /// Borrow the elements of an array of the matching kind.
    fn from_array(array: &ScalarArray) -> Option<&[Self]>;

    fn into_array(values: Vec<Self>) -> ScalarArray;
}

macro_rules! impl_scalar_value {
    ($ty:ty, $variant:ident) => {
        impl ScalarValue for $ty {
            const TYPE: ScalarType = ScalarType::$variant;

            fn from_scalar(scalar: &Scalar) -> Option<&Self> {
                match scalar {
                    Scalar::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn from_array(array: &ScalarArray) -> Option<&[Self]> {
                match array {
                    ScalarArray::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_array(values: Vec<Self>) -> ScalarArray {
                ScalarArray::$variant(values)
            }
        }

        impl From<$ty> for Scalar {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }

        impl From<Vec<$ty>> for ScalarArray {
            fn from(v: Vec<$ty>) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_scalar_value!(bool, Boolean);
impl_scalar_value!(i16, Short);
impl_scalar_value!(i32, Int);
impl_scalar_value!(i64, Long);
impl_scalar_value!(f64, Double);
impl_scalar_value!(String, String);

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<&str>> for ScalarArray {
    fn from(v: Vec<&str>) -> Self {
        Self::String(v.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_types() {
        assert_eq!(Scalar::Boolean(true).scalar_type(), ScalarType::Boolean);
        assert_eq!(Scalar::Short(1).scalar_type(), ScalarType::Short);
        assert_eq!(Scalar::Int(1).scalar_type(), ScalarType::Int);
        assert_eq!(Scalar::Long(1).scalar_type(), ScalarType::Long);
        assert_eq!(Scalar::Double(1.0).scalar_type(), ScalarType::Double);
        assert_eq!(Scalar::from("x").scalar_type(), ScalarType::String);
    }

    #[test]
    fn test_scalar_accessors_are_exact() {
        let val = Scalar::Long(42);
        assert_eq!(val.as_long(), Some(42));
        assert!(val.as_int().is_none());
        assert!(val.as_double().is_none());
        assert!(val.as_string().is_none());
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(format!("{}", Scalar::Boolean(true)), "true");
        assert_eq!(format!("{}", Scalar::Int(42)), "42");
        assert_eq!(format!("{}", Scalar::Double(2.5)), "2.5");
        assert_eq!(format!("{}", Scalar::from("hi")), "hi");
    }

    #[test]
    fn test_default_for() {
        assert_eq!(Scalar::default_for(ScalarType::Int), Scalar::Int(0));
        assert_eq!(
            Scalar::default_for(ScalarType::String),
            Scalar::String(String::new())
        );
    }

    #[test]
    fn test_array_basics() {
        let arr = ScalarArray::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(arr.element_type(), ScalarType::Double);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(1), Some(Scalar::Double(2.0)));
        assert_eq!(arr.get(3), None);
        assert_eq!(format!("{arr}"), "[1,2,3]");
        assert!(ScalarArray::empty(ScalarType::Int).is_empty());
    }

    #[test]
    fn test_scalar_value_trait() {
        let s = Scalar::Int(7);
        assert_eq!(i32::from_scalar(&s), Some(&7));
        assert_eq!(i64::from_scalar(&s), None);

        let arr = String::into_array(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            String::from_array(&arr),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert!(f64::from_array(&arr).is_none());
    }

    #[test]
    fn test_scalar_serialization() {
        let val = Scalar::String("test".into());
        let json = serde_json::to_string(&val).unwrap();
        let back: Scalar = serde_json::from_str(&json).unwrap();
        assert_eq!(val, back);
    }
}
