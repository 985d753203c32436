//! Structured record values and the field path accessor.
//!
//! A record's value is a [`Structure`]: an ordered list of named
//! [`Field`]s, some of which are themselves structures. Leaves are located
//! by dotted [`FieldPath`]s and read or written through typed accessors:
//!
//! | leaf kind     | read                      | write                         |
//! |---------------|---------------------------|-------------------------------|
//! | scalar        | [`Structure::get`]        | [`Structure::put`]            |
//! | array         | [`Structure::view`]       | [`Structure::replace`]        |
//! | union         | [`Structure::union`]      | [`Structure::union_mut`]      |
//! | union array   | [`Structure::union_array`]| [`Structure::replace_unions`] |
//! | enumerated    | [`Structure::enumerated`] | `put::<i32>("<path>.index")`  |
//!
//! Everything here is local and synchronous.

mod path;
mod union;

use serde::{Deserialize, Serialize};

use crate::error::FieldAccessError;
use crate::value::{Scalar, ScalarArray, ScalarValue};

pub use path::FieldPath;
pub use union::UnionValue;

/// Type id of enumerated sub-structures.
pub const ENUM_TYPE_ID: &str = "enum_t";

/// One node of a record's value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Field {
    Scalar(Scalar),
    ScalarArray(ScalarArray),
    Structure(Structure),
    Union(UnionValue),
    UnionArray(Vec<UnionValue>),
}

impl Field {
    /// Human-readable kind, used in [`FieldAccessError::KindMismatch`].
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(s) => s.scalar_type().name().to_string(),
            Self::ScalarArray(a) => format!("{}[]", a.element_type()),
            Self::Structure(s) => format!("structure {}", s.type_id()),
            Self::Union(_) => "union".to_string(),
            Self::UnionArray(_) => "union[]".to_string(),
        }
    }

    /// True when `other` may overwrite `self` without changing the schema.
    ///
    /// Scalars and arrays must keep their element kind, structures their
    /// type id. Unions accept any selection.
    #[must_use]
    pub fn same_kind(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a.scalar_type() == b.scalar_type(),
            (Self::ScalarArray(a), Self::ScalarArray(b)) => a.element_type() == b.element_type(),
            (Self::Structure(a), Self::Structure(b)) => a.type_id() == b.type_id(),
            (Self::Union(_), Self::Union(_)) | (Self::UnionArray(_), Self::UnionArray(_)) => true,
            _ => false,
        }
    }
}

impl From<Scalar> for Field {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<ScalarArray> for Field {
    fn from(v: ScalarArray) -> Self {
        Self::ScalarArray(v)
    }
}

impl From<Structure> for Field {
    fn from(v: Structure) -> Self {
        Self::Structure(v)
    }
}

impl From<UnionValue> for Field {
    fn from(v: UnionValue) -> Self {
        Self::Union(v)
    }
}

impl From<Vec<UnionValue>> for Field {
    fn from(v: Vec<UnionValue>) -> Self {
        Self::UnionArray(v)
    }
}

/// Read view of an enumerated leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enumerated<'a> {
    pub index: i32,
    pub choices: &'a [String],
}

impl<'a> Enumerated<'a> {
    /// The label `index` points at, if it is in range.
    #[must_use]
    pub fn label(&self) -> Option<&'a str> {
        usize::try_from(self.index)
            .ok()
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
    }
}

/// A named, ordered collection of fields with a type id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Structure {
    type_id: String,
    fields: Vec<(String, Field)>,
}

impl Structure {
    /// An empty structure with the given type id.
    #[must_use]
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, builder style.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.push_field(name, field);
        self
    }

    /// Appends a field, or overwrites a field of the same name in place.
    pub fn push_field(&mut self, name: impl Into<String>, field: impl Into<Field>) {
        let name = name.into();
        let field = field.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = field,
            None => self.fields.push((name, field)),
        }
    }

    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Direct children in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// Direct child by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Direct child by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Resolves a dotted path to the field it names.
    ///
    /// # Errors
    /// `InvalidPath` for a malformed path, `NotFound` when a segment does
    /// not exist, `KindMismatch` when an intermediate segment is not a
    /// structure.
    pub fn sub_field(&self, path: &str) -> Result<&Field, FieldAccessError> {
        let parsed = FieldPath::parse(path)?;
        let mut current = self;
        let last = parsed.segments().len() - 1;
        for (depth, segment) in parsed.segments().iter().enumerate() {
            let field = current
                .field(segment)
                .ok_or_else(|| FieldAccessError::NotFound {
                    path: path.to_string(),
                })?;
            if depth == last {
                return Ok(field);
            }
            current = match field {
                Field::Structure(s) => s,
                other => {
                    return Err(FieldAccessError::KindMismatch {
                        path: parsed.prefix(depth + 1),
                        expected: "structure".to_string(),
                        actual: other.describe(),
                    })
                }
            };
        }
        unreachable!("FieldPath::parse never yields an empty path")
    }

    /// Mutable counterpart of [`Structure::sub_field`].
    ///
    /// # Errors
    /// Same as [`Structure::sub_field`].
    pub fn sub_field_mut(&mut self, path: &str) -> Result<&mut Field, FieldAccessError> {
        let parsed = FieldPath::parse(path)?;
        let mut current = self;
        let last = parsed.segments().len() - 1;
        for (depth, segment) in parsed.segments().iter().enumerate() {
            let field = current
                .field_mut(segment)
                .ok_or_else(|| FieldAccessError::NotFound {
                    path: path.to_string(),
                })?;
            if depth == last {
                return Ok(field);
            }
            current = match field {
                Field::Structure(s) => s,
                other => {
                    return Err(FieldAccessError::KindMismatch {
                        path: parsed.prefix(depth + 1),
                        expected: "structure".to_string(),
                        actual: other.describe(),
                    })
                }
            };
        }
        unreachable!("FieldPath::parse never yields an empty path")
    }

    /// Resolves a path that must name a sub-structure.
    ///
    /// # Errors
    /// As [`Structure::sub_field`], plus `KindMismatch` for a non-structure leaf.
    pub fn sub_structure(&self, path: &str) -> Result<&Self, FieldAccessError> {
        match self.sub_field(path)? {
            Field::Structure(s) => Ok(s),
            other => Err(mismatch(path, "structure", other)),
        }
    }

    /// Borrows a scalar leaf of any kind.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not a scalar.
    pub fn scalar(&self, path: &str) -> Result<&Scalar, FieldAccessError> {
        match self.sub_field(path)? {
            Field::Scalar(s) => Ok(s),
            other => Err(mismatch(path, "scalar", other)),
        }
    }

    /// Borrows an array leaf of any element kind.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not a scalar array.
    pub fn scalar_array(&self, path: &str) -> Result<&ScalarArray, FieldAccessError> {
        match self.sub_field(path)? {
            Field::ScalarArray(a) => Ok(a),
            other => Err(mismatch(path, "array", other)),
        }
    }

    /// Reads a scalar leaf as `T`.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not a `T` scalar.
    pub fn get<T: ScalarValue>(&self, path: &str) -> Result<T, FieldAccessError> {
        match self.sub_field(path)? {
            Field::Scalar(s) => T::from_scalar(s)
                .cloned()
                .ok_or_else(|| mismatch(path, T::TYPE.name(), &Field::Scalar(s.clone()))),
            other => Err(mismatch(path, T::TYPE.name(), other)),
        }
    }

    /// Writes a scalar leaf.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not a `T` scalar.
    pub fn put<T: ScalarValue>(&mut self, path: &str, value: T) -> Result<(), FieldAccessError> {
        let field = self.sub_field_mut(path)?;
        match field {
            Field::Scalar(s) if s.scalar_type() == T::TYPE => {
                *s = value.into_scalar();
                Ok(())
            }
            other => Err(mismatch(path, T::TYPE.name(), other)),
        }
    }

    /// Borrows an array leaf's elements.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not an array of `T`.
    pub fn view<T: ScalarValue>(&self, path: &str) -> Result<&[T], FieldAccessError> {
        let field = self.sub_field(path)?;
        let found = match field {
            Field::ScalarArray(a) => T::from_array(a),
            _ => None,
        };
        found.ok_or_else(|| mismatch(path, &format!("{}[]", T::TYPE), field))
    }

    /// Replaces an array leaf wholesale. `values` is consumed.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not an array of `T`.
    pub fn replace<T: ScalarValue>(
        &mut self,
        path: &str,
        values: Vec<T>,
    ) -> Result<(), FieldAccessError> {
        let field = self.sub_field_mut(path)?;
        match field {
            Field::ScalarArray(a) if a.element_type() == T::TYPE => {
                *a = T::into_array(values);
                Ok(())
            }
            other => Err(mismatch(path, &format!("{}[]", T::TYPE), other)),
        }
    }

    /// Borrows a union leaf.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not a union.
    pub fn union(&self, path: &str) -> Result<&UnionValue, FieldAccessError> {
        match self.sub_field(path)? {
            Field::Union(u) => Ok(u),
            other => Err(mismatch(path, "union", other)),
        }
    }

    /// Mutably borrows a union leaf.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not a union.
    pub fn union_mut(&mut self, path: &str) -> Result<&mut UnionValue, FieldAccessError> {
        match self.sub_field_mut(path)? {
            Field::Union(u) => Ok(u),
            other => Err(mismatch(path, "union", other)),
        }
    }

    /// Reads a union leaf as `T`.
    ///
    /// # Errors
    /// `KindMismatch` if the union currently holds another kind,
    /// `EmptyUnion` if it holds nothing.
    pub fn union_value<T: ScalarValue>(&self, path: &str) -> Result<T, FieldAccessError> {
        self.union(path)?.get::<T>().map_err(|e| e.at(path))
    }

    /// Borrows a union array leaf.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not a union array.
    pub fn union_array(&self, path: &str) -> Result<&[UnionValue], FieldAccessError> {
        match self.sub_field(path)? {
            Field::UnionArray(u) => Ok(u),
            other => Err(mismatch(path, "union[]", other)),
        }
    }

    /// Replaces a union array leaf wholesale. `values` is consumed.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not a union array.
    pub fn replace_unions(
        &mut self,
        path: &str,
        values: Vec<UnionValue>,
    ) -> Result<(), FieldAccessError> {
        match self.sub_field_mut(path)? {
            Field::UnionArray(u) => {
                *u = values;
                Ok(())
            }
            other => Err(mismatch(path, "union[]", other)),
        }
    }

    /// Reads an enumerated leaf: its index and the schema's choice list.
    ///
    /// # Errors
    /// `KindMismatch` when the leaf is not an `enum_t` structure.
    pub fn enumerated(&self, path: &str) -> Result<Enumerated<'_>, FieldAccessError> {
        let field = self.sub_field(path)?;
        let Field::Structure(s) = field else {
            return Err(mismatch(path, ENUM_TYPE_ID, field));
        };
        if s.type_id() != ENUM_TYPE_ID {
            return Err(mismatch(path, ENUM_TYPE_ID, field));
        }
        let index = s.get::<i32>("index").map_err(|e| e.at(&format!("{path}.index")))?;
        let choices = s
            .view::<String>("choices")
            .map_err(|e| e.at(&format!("{path}.choices")))?;
        Ok(Enumerated { index, choices })
    }

    /// Overwrites the field at `path` with a value of the same kind.
    ///
    /// # Errors
    /// `KindMismatch` when `value` would change the leaf's kind.
    pub fn set_field(&mut self, path: &str, value: Field) -> Result<(), FieldAccessError> {
        let field = self.sub_field_mut(path)?;
        if !field.same_kind(&value) {
            return Err(FieldAccessError::KindMismatch {
                path: path.to_string(),
                expected: field.describe(),
                actual: value.describe(),
            });
        }
        *field = value;
        Ok(())
    }

    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        for (name, field) in &self.fields {
            let pad = "    ".repeat(depth);
            match field {
                Field::Scalar(s) => writeln!(f, "{pad}{} {name} {s}", s.scalar_type())?,
                Field::ScalarArray(a) => writeln!(f, "{pad}{}[] {name} {a}", a.element_type())?,
                Field::Union(u) => writeln!(f, "{pad}union {name} {u}")?,
                Field::UnionArray(items) => {
                    writeln!(f, "{pad}union[] {name}")?;
                    for item in items {
                        writeln!(f, "{pad}    {item}")?;
                    }
                }
                Field::Structure(s) => {
                    writeln!(f, "{pad}{} {name}", s.type_id())?;
                    s.fmt_indented(f, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.type_id)?;
        self.fmt_indented(f, 1)
    }
}

fn mismatch(path: &str, expected: &str, actual: &Field) -> FieldAccessError {
    FieldAccessError::KindMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: actual.describe(),
    }
}
