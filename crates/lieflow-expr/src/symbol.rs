//! Named scalar variables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named scalar variable.
///
/// Symbols compare and order by name, so two symbols with the same name
/// are the same variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol.
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    /// The symbol's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(name)
    }
}

/// Create a list of symbols from a whitespace- or comma-separated string.
///
/// ```rust
/// use lieflow_expr::symbols;
///
/// let qs = symbols("x, y z");
/// assert_eq!(qs.len(), 3);
/// assert_eq!(qs[2].name(), "z");
/// ```
pub fn symbols(names: &str) -> Vec<Symbol> {
    names
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(Symbol::new)
        .collect()
}
