use crate::client::Channel;
use crate::error::DemoResult;
use crate::nt::NT_TABLE;

use super::{compare_slices, join, Verification, Verifier};

/// NTTable: writes each `value.<column>` string array independently.
///
/// `labels` is server metadata; it is rendered but never compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableVerifier {
    columns: Vec<(String, Vec<String>)>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for TableVerifier {
    fn default() -> Self {
        Self::new()
            .with_column(
                "questions",
                owned(&[
                    "Why are we here?",
                    "How are we to be happy?",
                    "Whats the meaning to life?",
                    "Whats the answer to the ultimate question of life, the universe, and everything?",
                ]),
            )
            .with_column("answers", owned(&["42"]))
            .with_column(
                "recommendations",
                owned(&[
                    "Keep calm.",
                    "Always carry a towel.",
                    "Drink heavily and read the guide.",
                ]),
            )
    }
}

impl TableVerifier {
    /// A verifier with no columns.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Adds a column; each column owns its own rows.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, rows: Vec<String>) -> Self {
        self.columns.push((name.into(), rows));
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[(String, Vec<String>)] {
        &self.columns
    }
}

impl Verifier for TableVerifier {
    fn schema(&self) -> &'static str {
        NT_TABLE
    }

    fn run(&self, channel: &Channel) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let mut put_get = channel.create_put_get()?;

        for (name, rows) in &self.columns {
            put_get
                .put_data_mut()
                .replace(&format!("value.{name}"), rows.clone())?;
        }
        put_get.execute()?;

        let read = put_get.get_data();
        let labels = read.view::<String>("labels")?;
        v.line(format!("\t          labels: {}", join(labels, " | ")));
        for (name, rows) in &self.columns {
            let actual = read.view::<String>(&format!("value.{name}"))?;
            compare_slices(&mut v, name, rows, actual);
        }
        Ok(v)
    }
}
