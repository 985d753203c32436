//! Per-schema round-trip verifiers.
//!
//! Every verifier follows the same pass: build expected values from fixed
//! literals, populate only its schema's fields on a fresh [`PutGet`],
//! execute once, read the same fields back and compare them exactly. The
//! outcome is one boolean (the AND of all comparisons) plus a transcript
//! of what was written and read.
//!
//! [`PutGet`]: crate::client::PutGet

mod attribute;
mod enumerated;
mod matrix;
mod multi_channel;
mod name_value;
mod scalar;
mod table;
mod uri;

use std::fmt::Display;

use crate::client::Channel;
use crate::error::DemoResult;

pub use attribute::AttributeVerifier;
pub use enumerated::EnumVerifier;
pub use matrix::{reshape, MatrixVerifier};
pub use multi_channel::MultiChannelAggregator;
pub use name_value::NameValueVerifier;
pub use scalar::{ScalarArrayVerifier, ScalarVerifier};
pub use table::TableVerifier;
pub use uri::UriVerifier;

/// One schema-specific write/read/compare pass.
pub trait Verifier: Send + Sync {
    /// Normative type this verifier exercises, for diagnostics.
    fn schema(&self) -> &'static str;

    /// Runs the pass against `channel`.
    ///
    /// Value mismatches are reported through the returned
    /// [`Verification`]; `Err` is reserved for field access, channel and
    /// transport failures.
    fn run(&self, channel: &Channel) -> DemoResult<Verification>;
}

/// Outcome of one verifier pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    success: bool,
    transcript: String,
    failures: Vec<String>,
}

impl Default for Verification {
    fn default() -> Self {
        Self::new()
    }
}

impl Verification {
    /// A passing verification with an empty transcript.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            success: true,
            transcript: String::new(),
            failures: Vec::new(),
        }
    }

    /// Folds one comparison into the outcome and returns it.
    pub fn check(&mut self, ok: bool) -> bool {
        self.success &= ok;
        ok
    }

    /// Marks the pass failed with a reason.
    ///
    /// The reason goes to the transcript and to [`Verification::failures`].
    pub fn fail(&mut self, reason: impl AsRef<str>) {
        self.success = false;
        self.failures.push(reason.as_ref().trim().to_string());
        self.line(reason);
    }

    /// Appends one transcript line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.transcript.push_str(text.as_ref());
        self.transcript.push('\n');
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// One line per failed comparison or [`Verification::fail`] call.
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

pub(crate) fn join<T: Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Compares one written value with what was read back.
pub(crate) fn compare_value<T: PartialEq + Display + ?Sized>(
    v: &mut Verification,
    label: &str,
    expected: &T,
    actual: &T,
) -> bool {
    if expected == actual {
        v.line(format!("\t{label:>16}: wrote {expected}, read {actual}"));
        return true;
    }
    v.fail(format!("\t{label:>16}: wrote {expected}, read {actual}  (mismatch)"));
    false
}

/// Compares a written array with what was read back, element by element.
///
/// A length difference is a failure on its own.
pub(crate) fn compare_slices<T: PartialEq + Display>(
    v: &mut Verification,
    label: &str,
    expected: &[T],
    actual: &[T],
) -> bool {
    v.line(format!("\t{label:>16}: {}", join(actual, " ")));
    if expected.len() != actual.len() {
        v.fail(format!(
            "\t{label:>16}  length mismatch: wrote {}, read {}",
            expected.len(),
            actual.len()
        ));
        return false;
    }
    let first_bad = expected.iter().zip(actual).position(|(e, a)| e != a);
    match first_bad {
        Some(i) => {
            v.fail(format!(
                "\t{label:>16}  mismatch at [{i}]: wrote {}, read {}",
                expected[i], actual[i]
            ));
            false
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_ands_checks() {
        let mut v = Verification::new();
        assert!(v.check(true));
        assert!(v.success());
        assert!(!v.check(false));
        assert!(v.check(true));
        assert!(!v.success());
    }

    #[test]
    fn test_compare_value() {
        let mut v = Verification::new();
        assert!(compare_value(&mut v, "scheme", "a", "a"));
        assert!(!compare_value(&mut v, "path", "a", "b"));
        assert!(!v.success());
        assert!(v.transcript().contains("(mismatch)"));
        assert_eq!(v.failures(), ["path: wrote a, read b  (mismatch)"]);
    }

    #[test]
    fn test_failures_kept_apart_from_transcript() {
        let mut v = Verification::new();
        v.line("\tsome detail");
        v.fail("\tnot connected: double");
        assert_eq!(v.failures(), ["not connected: double"]);
        assert!(v.transcript().contains("some detail"));
    }

    #[test]
    fn test_compare_slices_equal() {
        let mut v = Verification::new();
        assert!(compare_slices(&mut v, "values", &[1.0, 2.0], &[1.0, 2.0]));
        assert!(v.success());
    }

    #[test]
    fn test_compare_slices_length_mismatch() {
        let mut v = Verification::new();
        let names = ["one", "two", "three"];
        assert!(!compare_slices(&mut v, "names", &names, &names[..2]));
        assert!(v.transcript().contains("length mismatch: wrote 3, read 2"));
        assert_eq!(v.failures().len(), 1);
    }

    #[test]
    fn test_compare_slices_element_mismatch() {
        let mut v = Verification::new();
        assert!(!compare_slices(&mut v, "dim", &[5, 5], &[5, 4]));
        assert!(v.transcript().contains("mismatch at [1]"));
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&[1, 2, 3], ", "), "1, 2, 3");
        assert_eq!(join::<i32>(&[], ", "), "");
    }
}
