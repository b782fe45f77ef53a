use serde::{Deserialize, Serialize};

/// Inclusion chance used when a slot carries no explicit percentage.
pub const ALWAYS: u8 = 100;

/// One position within a syllable template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Name of the phoneme group this slot draws from.
    pub group: String,
    /// Chance, in percent, that the slot is realized at all. Never above 100.
    pub chance: u8,
}

impl Slot {
    pub fn new(group: impl Into<String>, chance: u8) -> Self {
        Self {
            group: group.into(),
            chance,
        }
    }

    pub fn always(group: impl Into<String>) -> Self {
        Self::new(group, ALWAYS)
    }

    pub fn is_optional(&self) -> bool {
        self.chance < ALWAYS
    }
}

/// A syllable template: an ordered list of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllable {
    pub name: String,
    pub slots: Vec<Slot>,
}

impl Syllable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
        }
    }

    /// Phoneme group names referenced by this template, in slot order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.group.as_str())
    }

    /// True when no slot can ever be realized.
    pub fn is_always_empty(&self) -> bool {
        self.slots.iter().all(|s| s.chance == 0)
    }
}
