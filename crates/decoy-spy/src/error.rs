//! Error types for expectations

/// Failed expectation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// A single expectation did not hold
    #[error("expected {spy} {expected}, but {actual}")]
    Mismatch {
        /// Spy name
        spy: String,
        /// Expectation as text
        expected: String,
        /// What the spy actually recorded
        actual: String,
    },

    /// Several deferred expectations did not hold
    #[error("{} verification(s) failed:\n{}", failures.len(), render(failures))]
    Multiple {
        /// Individual failures, in registration order
        failures: Vec<VerificationError>,
    },
}

impl VerificationError {
    /// Collapse a list of failures; `None` when the list is empty
    #[must_use]
    pub fn combine(mut failures: Vec<VerificationError>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => Some(Self::Multiple { failures }),
        }
    }

    /// Number of individual failures
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Mismatch { .. } => 1,
            Self::Multiple { failures } => failures.iter().map(Self::count).sum(),
        }
    }
}

fn render(failures: &[VerificationError]) -> String {
    failures
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}
