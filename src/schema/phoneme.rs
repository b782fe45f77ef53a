use serde::{Deserialize, Serialize};

/// One member of a phoneme group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phoneme {
    pub symbol: String,
    /// Digit run written directly after the symbol (`a1`). Metadata only;
    /// it never changes how members are drawn.
    #[serde(default)]
    pub tag: Option<u32>,
}

impl Phoneme {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            tag: None,
        }
    }

    pub fn tagged(symbol: impl Into<String>, tag: u32) -> Self {
        Self {
            symbol: symbol.into(),
            tag: Some(tag),
        }
    }
}

/// A named set of interchangeable symbols. Slots draw from it uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemeGroup {
    pub name: String,
    pub members: Vec<Phoneme>,
}

impl PhonemeGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if any member is spelled `symbol`.
    pub fn contains(&self, symbol: &str) -> bool {
        self.members.iter().any(|p| p.symbol == symbol)
    }

    /// Member symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|p| p.symbol.as_str())
    }
}
