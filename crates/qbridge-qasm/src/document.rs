//! The textual exchange form of a circuit.

use std::fmt;

/// OpenQASM 3 text handed from one framework to the other.
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExchangeDocument {
    text: String,
}

impl ExchangeDocument {
    /// Wrap OpenQASM text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The document text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Lines of the document.
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    /// Take the text out of the document.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ExchangeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for ExchangeDocument {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<String> for ExchangeDocument {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
