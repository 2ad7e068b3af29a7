//! Member selectors
//!
//! A selector names a member by showing how it is read, for example
//! `|s| s.login` or `s => s.login`. Only the text is inspected; a selector
//! is never evaluated.
//!
//! # Grammar
//! ```text
//! selector := params body
//! params   := '|' ident (':' type)? '|' | ident '=>' | '(' ident ')' '=>'
//! body     := ident '.' ident          (first ident is the parameter)
//! ```
//! Whitespace between tokens is ignored.

use crate::error::SelectorParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

static SELECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        (?:
            \|\s*(?P<closure>[A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*[^|\s][^|]*?)?\s*\|
          | (?P<arrow>[A-Za-z_][A-Za-z0-9_]*)\s*=>
          | \(\s*(?P<paren>[A-Za-z_][A-Za-z0-9_]*)\s*\)\s*=>
        )
        \s*(?P<receiver>[A-Za-z_][A-Za-z0-9_]*)\s*\.\s*(?P<member>[A-Za-z_][A-Za-z0-9_]*)
        \s*$",
    )
    .expect("selector grammar compiles")
});

/// Member name extracted from selector text
///
/// ```
/// use decoy_core::Selector;
///
/// let selector: Selector = "|s: LoginService| s.login".parse().unwrap();
/// assert_eq!(selector.member(), "login");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    text: String,
    member: String,
}

impl Selector {
    /// Parse selector text
    ///
    /// # Errors
    /// [`SelectorParseError`] when `text` is outside the grammar.
    pub fn parse(text: &str) -> Result<Self, SelectorParseError> {
        if text.trim().is_empty() {
            return Err(SelectorParseError::Empty);
        }
        let caps = SELECTOR
            .captures(text)
            .ok_or_else(|| SelectorParseError::Malformed {
                selector: text.to_string(),
            })?;
        let param = caps
            .name("closure")
            .or_else(|| caps.name("arrow"))
            .or_else(|| caps.name("paren"))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let receiver = caps.name("receiver").map_or("", |m| m.as_str());
        if receiver != param {
            return Err(SelectorParseError::ForeignReceiver {
                selector: text.to_string(),
                param: param.to_string(),
                found: receiver.to_string(),
            });
        }
        let member = caps.name("member").map_or("", |m| m.as_str());
        Ok(Self {
            text: text.to_string(),
            member: member.to_string(),
        })
    }

    /// Selected member
    #[inline]
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Original text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Turn a closure into a [`Selector`] source without evaluating it
///
/// Expands to a [`MemberRef`](crate::MemberRef), which is parsed when the
/// member is needed.
///
/// ```
/// use decoy_core::{selector, MemberRef};
///
/// let member: MemberRef = selector!(|s| s.login);
/// assert_eq!(member.resolve().unwrap(), "login");
/// ```
#[macro_export]
macro_rules! selector {
    ($($closure:tt)+) => {
        $crate::MemberRef::Selector(::std::string::String::from(::std::stringify!($($closure)+)))
    };
}

/// A member given literally or through selector text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberRef {
    /// Used verbatim
    Name(String),
    /// Parsed with [`Selector::parse`]
    Selector(String),
}

impl MemberRef {
    /// Member name
    ///
    /// # Errors
    /// [`SelectorParseError`] when selector text is outside the grammar.
    pub fn resolve(&self) -> Result<String, SelectorParseError> {
        match self {
            Self::Name(name) => Ok(name.clone()),
            Self::Selector(text) => Selector::parse(text).map(|s| s.member),
        }
    }
}

impl From<&str> for MemberRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for MemberRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Selector> for MemberRef {
    fn from(selector: Selector) -> Self {
        Self::Name(selector.member)
    }
}

impl From<&Selector> for MemberRef {
    fn from(selector: &Selector) -> Self {
        Self::Name(selector.member.clone())
    }
}
