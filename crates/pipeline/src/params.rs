//! Run-parameter log carried through the pipeline.

use serde::Serialize;

/// Ordered `(parameter, value)` log of everything a run was configured
/// with, for inclusion in the final report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunParameters {
    entries: Vec<(String, String)>,
}

impl RunParameters {
    /// Record one parameter; later stages append, never overwrite.
    pub fn record(&mut self, name: impl Into<String>, value: impl ToString) {
        self.entries.push((name.into(), value.to_string()));
    }

    /// The recorded `(parameter, value)` pairs in record order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}
