//! Normative type builders and the standard demo database.
//!
//! Each builder returns the value tree a server hosts for that normative
//! type, with default (zero) contents. Field names follow the normative
//! type definitions, including the optional `descriptor`, `alarm` and
//! `timeStamp` members.

use crate::field::{Structure, UnionValue, ENUM_TYPE_ID};
use crate::value::{Scalar, ScalarArray, ScalarType};

pub const NT_SCALAR: &str = "epics:nt/NTScalar:1.0";
pub const NT_SCALAR_ARRAY: &str = "epics:nt/NTScalarArray:1.0";
pub const NT_ENUM: &str = "epics:nt/NTEnum:1.0";
pub const NT_MATRIX: &str = "epics:nt/NTMatrix:1.0";
pub const NT_URI: &str = "epics:nt/NTURI:1.0";
pub const NT_NAME_VALUE: &str = "epics:nt/NTNameValue:1.0";
pub const NT_TABLE: &str = "epics:nt/NTTable:1.0";
pub const NT_ATTRIBUTE: &str = "epics:nt/NTAttribute:1.0";
pub const NT_MULTI_CHANNEL: &str = "epics:nt/NTMultiChannel:1.0";

/// Type id of the `alarm` member.
pub const ALARM_TYPE_ID: &str = "alarm_t";
/// Type id of the `timeStamp` member.
pub const TIME_STAMP_TYPE_ID: &str = "time_t";

/// `alarm_t { int severity; int status; string message }`
#[must_use]
pub fn alarm() -> Structure {
    Structure::new(ALARM_TYPE_ID)
        .with_field("severity", Scalar::Int(0))
        .with_field("status", Scalar::Int(0))
        .with_field("message", Scalar::from(""))
}

/// `time_t { long secondsPastEpoch; int nanoseconds; int userTag }`
#[must_use]
pub fn time_stamp() -> Structure {
    Structure::new(TIME_STAMP_TYPE_ID)
        .with_field("secondsPastEpoch", Scalar::Long(0))
        .with_field("nanoseconds", Scalar::Int(0))
        .with_field("userTag", Scalar::Int(0))
}

fn with_common(s: Structure) -> Structure {
    s.with_field("descriptor", Scalar::from(""))
        .with_field("alarm", alarm())
        .with_field("timeStamp", time_stamp())
}

/// NTScalar holding `value`.
#[must_use]
pub fn nt_scalar(value: Scalar) -> Structure {
    with_common(Structure::new(NT_SCALAR).with_field("value", value))
}

/// NTScalarArray holding `value`.
#[must_use]
pub fn nt_scalar_array(value: ScalarArray) -> Structure {
    with_common(Structure::new(NT_SCALAR_ARRAY).with_field("value", value))
}

/// NTEnum over `choices`, index 0.
#[must_use]
pub fn nt_enum(choices: &[&str]) -> Structure {
    let value = Structure::new(ENUM_TYPE_ID)
        .with_field("index", Scalar::Int(0))
        .with_field("choices", ScalarArray::from(choices.to_vec()));
    with_common(Structure::new(NT_ENUM).with_field("value", value))
}

/// NTMatrix with empty `value` (double[]) and `dim` (int[]).
#[must_use]
pub fn nt_matrix() -> Structure {
    with_common(
        Structure::new(NT_MATRIX)
            .with_field("value", ScalarArray::empty(ScalarType::Double))
            .with_field("dim", ScalarArray::empty(ScalarType::Int)),
    )
}

/// NTURI with a single `query.query` string argument.
#[must_use]
pub fn nt_uri() -> Structure {
    Structure::new(NT_URI)
        .with_field("scheme", Scalar::from(""))
        .with_field("authority", Scalar::from(""))
        .with_field("path", Scalar::from(""))
        .with_field(
            "query",
            Structure::new("query_t").with_field("query", Scalar::from("")),
        )
}

/// NTNameValue with `name` (string[]) and `value` (double[]).
#[must_use]
pub fn nt_name_value() -> Structure {
    with_common(
        Structure::new(NT_NAME_VALUE)
            .with_field("name", ScalarArray::empty(ScalarType::String))
            .with_field("value", ScalarArray::empty(ScalarType::Double)),
    )
}

/// NTTable with one string column per label.
#[must_use]
pub fn nt_table(columns: &[&str]) -> Structure {
    let value = columns.iter().fold(Structure::new("table_value_t"), |s, c| {
        s.with_field(*c, ScalarArray::empty(ScalarType::String))
    });
    with_common(
        Structure::new(NT_TABLE)
            .with_field("labels", ScalarArray::from(columns.to_vec()))
            .with_field("value", value),
    )
}

/// NTAttribute with an empty variant union `value`.
#[must_use]
pub fn nt_attribute() -> Structure {
    with_common(
        Structure::new(NT_ATTRIBUTE)
            .with_field("name", Scalar::from(""))
            .with_field("value", UnionValue::new())
            .with_field("tags", ScalarArray::empty(ScalarType::String)),
    )
}

/// NTMultiChannel with empty `value`, `channelName` and `isConnected`.
#[must_use]
pub fn nt_multi_channel() -> Structure {
    with_common(
        Structure::new(NT_MULTI_CHANNEL)
            .with_field("value", Vec::<UnionValue>::new())
            .with_field("channelName", ScalarArray::empty(ScalarType::String))
            .with_field("isConnected", ScalarArray::empty(ScalarType::Boolean)),
    )
}

/// Column labels of the standard `table` record.
pub const TABLE_COLUMNS: [&str; 3] = ["questions", "answers", "recommendations"];

/// Choices of the standard `enum` record.
pub const ENUM_CHOICES: [&str; 2] = ["zero", "one"];

/// Every record the demo exercises, keyed by channel name.
#[must_use]
pub fn standard_database() -> Vec<(String, Structure)> {
    let records = [
        ("string", nt_scalar(Scalar::from(""))),
        ("stringArray", nt_scalar_array(ScalarArray::empty(ScalarType::String))),
        ("short", nt_scalar(Scalar::Short(0))),
        ("shortArray", nt_scalar_array(ScalarArray::empty(ScalarType::Short))),
        ("int", nt_scalar(Scalar::Int(0))),
        ("intArray", nt_scalar_array(ScalarArray::empty(ScalarType::Int))),
        ("long", nt_scalar(Scalar::Long(0))),
        ("longArray", nt_scalar_array(ScalarArray::empty(ScalarType::Long))),
        ("double", nt_scalar(Scalar::Double(0.0))),
        ("doubleArray", nt_scalar_array(ScalarArray::empty(ScalarType::Double))),
        ("enum", nt_enum(&ENUM_CHOICES)),
        ("matrix", nt_matrix()),
        ("uri", nt_uri()),
        ("name_value", nt_name_value()),
        ("table", nt_table(&TABLE_COLUMNS)),
        ("attribute", nt_attribute()),
        ("multi_channel", nt_multi_channel()),
    ];
    records
        .into_iter()
        .map(|(name, s)| (name.to_string(), s))
        .collect()
}
