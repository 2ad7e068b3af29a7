//! Error types for the object model

/// Faults raised while reading, writing or invoking object members
///
/// `Thrown` is what user code (method bodies, constructors, spy fakes) raises
/// on purpose; the engine never catches it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// Deliberate failure raised by a member body
    #[error("thrown: {0}")]
    Thrown(String),

    /// Method is not defined on the class and no rule intercepts it
    #[error("{class}.{method} is not a function")]
    MissingMethod {
        /// Class name
        class: String,
        /// Method that was called
        method: String,
    },

    /// Expected an object reference
    #[error("{context}: expected object, found {found}")]
    NotAnObject {
        /// What was being read
        context: String,
        /// Type name of the value found
        found: &'static str,
    },

    /// Argument of unexpected shape
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

impl ObjectError {
    /// Create a deliberate fault
    #[inline]
    pub fn thrown(message: impl Into<String>) -> Self {
        Self::Thrown(message.into())
    }

    /// Check whether this is a deliberate fault raised by user code
    #[inline]
    #[must_use]
    pub fn is_thrown(&self) -> bool {
        matches!(self, Self::Thrown(_))
    }
}
