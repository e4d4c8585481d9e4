//! Node identity module

use std::fmt;

/// Canonical identity of a counterparty in the transaction graph
///
/// Two records that name the same `(name, bank)` pair resolve to the same node.
/// Matching is exact: no trimming or case folding is applied, so
/// `"ACME"` and `"Acme "` are different nodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    /// Display name of the account holder
    pub name: String,

    /// Bank code or bank name
    pub bank: String,
}

impl NodeKey {
    /// Create a new node key
    ///
    /// # Examples
    ///
    /// ```
    /// use txflow_domain::NodeKey;
    ///
    /// let key = NodeKey::new("Alice", "B1");
    /// assert_eq!(key.to_string(), "Alice (B1)");
    /// ```
    pub fn new(name: impl Into<String>, bank: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bank: bank.into(),
        }
    }

    /// Whether this node belongs to the given bank
    pub fn is_at_bank(&self, bank: &str) -> bool {
        self.bank == bank
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.bank)
    }
}
