//! Variant union slots.

use serde::{Deserialize, Serialize};

use crate::error::FieldAccessError;
use crate::value::{Scalar, ScalarType, ScalarValue};

/// A slot holding at most one scalar, of any kind, at a time.
///
/// Reading it back requires naming the kind: `get::<String>()` on a union
/// that currently holds a `long` is a [`FieldAccessError::KindMismatch`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnionValue {
    value: Option<Scalar>,
}

impl UnionValue {
    /// An empty union.
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// A union already holding `value`.
    pub fn of(value: impl Into<Scalar>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// Selects `value`, replacing whatever was held before.
    pub fn set(&mut self, value: impl Into<Scalar>) {
        self.value = Some(value.into());
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Kind of the currently held value.
    #[must_use]
    pub fn selected_type(&self) -> Option<ScalarType> {
        self.value.as_ref().map(Scalar::scalar_type)
    }

    #[must_use]
    pub const fn scalar(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    /// Reads the held value as `T`.
    ///
    /// Errors carry an empty path; [`crate::field::Structure`] accessors
    /// fill it in.
    ///
    /// # Errors
    /// `EmptyUnion` when nothing is selected, `KindMismatch` when the held
    /// value is not a `T`.
    pub fn get<T: ScalarValue>(&self) -> Result<T, FieldAccessError> {
        let scalar = self.value.as_ref().ok_or(FieldAccessError::EmptyUnion {
            path: String::new(),
        })?;
        T::from_scalar(scalar)
            .cloned()
            .ok_or_else(|| FieldAccessError::KindMismatch {
                path: String::new(),
                expected: T::TYPE.name().to_string(),
                actual: scalar.scalar_type().name().to_string(),
            })
    }

    /// Reads the held value as the kind named at runtime.
    ///
    /// # Errors
    /// Same as [`UnionValue::get`].
    pub fn get_as(&self, scalar_type: ScalarType) -> Result<Scalar, FieldAccessError> {
        match scalar_type {
            ScalarType::Boolean => self.get::<bool>().map(Scalar::from),
            ScalarType::Short => self.get::<i16>().map(Scalar::from),
            ScalarType::Int => self.get::<i32>().map(Scalar::from),
            ScalarType::Long => self.get::<i64>().map(Scalar::from),
            ScalarType::Double => self.get::<f64>().map(Scalar::from),
            ScalarType::String => self.get::<String>().map(Scalar::from),
        }
    }
}

impl From<Scalar> for UnionValue {
    fn from(v: Scalar) -> Self {
        Self { value: Some(v) }
    }
}

impl std::fmt::Display for UnionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{} {v}", v.scalar_type()),
            None => f.write_str("(none)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_same_kind() {
        let mut u = UnionValue::new();
        assert!(u.is_empty());
        u.set("42");
        assert_eq!(u.selected_type(), Some(ScalarType::String));
        assert_eq!(u.get::<String>().unwrap(), "42");
    }

    #[test]
    fn test_get_wrong_kind_fails() {
        let u = UnionValue::of(7i64);
        let err = u.get::<String>().unwrap_err();
        assert_eq!(
            err,
            FieldAccessError::KindMismatch {
                path: String::new(),
                expected: "string".to_string(),
                actual: "long".to_string(),
            }
        );
    }

    #[test]
    fn test_get_empty_fails() {
        let u = UnionValue::new();
        assert!(matches!(
            u.get::<f64>(),
            Err(FieldAccessError::EmptyUnion { .. })
        ));
    }

    #[test]
    fn test_set_replaces_tag() {
        let mut u = UnionValue::of(1.5f64);
        u.set(true);
        assert_eq!(u.selected_type(), Some(ScalarType::Boolean));
        assert!(u.get::<f64>().is_err());
        u.clear();
        assert!(u.is_empty());
    }

    #[test]
    fn test_get_as_runtime_kind() {
        let u = UnionValue::of(2.5f64);
        assert_eq!(u.get_as(ScalarType::Double).unwrap(), Scalar::Double(2.5));
        assert!(u.get_as(ScalarType::Long).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(UnionValue::of(3i32).to_string(), "int 3");
        assert_eq!(UnionValue::new().to_string(), "(none)");
    }
}
