use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::phoneme::PhonemeGroup;
use super::sequence::DisallowedSequence;
use super::syllable::Syllable;

/// Numeric settings declared with `#name = value;`.
///
/// Anything left undeclared stays at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    pub mean: u32,
    pub low_deviation: u32,
    pub high_deviation: u32,
    pub words: u32,
    pub seed: u64,
}

/// The compiled, validated model a word generator runs from.
///
/// Only `SpecBuilder` (or deserializing a dumped model) constructs one;
/// once built it is read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Specification {
    pub(crate) config: Config,
    pub(crate) phoneme_groups: FxHashMap<String, PhonemeGroup>,
    /// Group names in declaration order.
    pub(crate) phoneme_names: Vec<String>,
    pub(crate) syllables: FxHashMap<String, Syllable>,
    /// The generation pool: template names in declaration order.
    pub(crate) syllable_names: Vec<String>,
    pub(crate) disallowed: Vec<DisallowedSequence>,
}

impl Specification {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mean_syllables(&self) -> u32 {
        self.config.mean
    }

    pub fn low_deviation(&self) -> u32 {
        self.config.low_deviation
    }

    pub fn high_deviation(&self) -> u32 {
        self.config.high_deviation
    }

    /// How many words a run should produce unless overridden.
    pub fn word_count(&self) -> u32 {
        self.config.words
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn phoneme_group(&self, name: &str) -> Option<&PhonemeGroup> {
        self.phoneme_groups.get(name)
    }

    /// Phoneme groups in declaration order.
    pub fn phoneme_groups(&self) -> impl Iterator<Item = &PhonemeGroup> {
        self.phoneme_names
            .iter()
            .filter_map(|name| self.phoneme_groups.get(name))
    }

    pub fn syllable(&self, name: &str) -> Option<&Syllable> {
        self.syllables.get(name)
    }

    /// Syllable templates in declaration order.
    pub fn syllables(&self) -> impl Iterator<Item = &Syllable> {
        self.syllable_names
            .iter()
            .filter_map(|name| self.syllables.get(name))
    }

    /// Template names words are drawn from.
    pub fn syllable_names(&self) -> &[String] {
        &self.syllable_names
    }

    pub fn disallowed(&self) -> &[DisallowedSequence] {
        &self.disallowed
    }

    /// Returns true if `sequence` contains any disallowed run.
    pub fn is_disallowed<S: AsRef<str>>(&self, sequence: &[S]) -> bool {
        self.disallowed
            .iter()
            .any(|banned| banned.is_contained_in(sequence))
    }

    /// Inclusive range every generated syllable count falls in.
    pub fn syllable_bounds(&self) -> (u32, u32) {
        let low = self.config.mean.saturating_sub(self.config.low_deviation);
        let high = self.config.mean.saturating_add(self.config.high_deviation);
        (low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::syllable::Slot;

    fn sample() -> Specification {
        let mut spec = Specification::default();
        spec.config = Config {
            mean: 2,
            low_deviation: 5,
            high_deviation: 1,
            words: 10,
            seed: 7,
        };
        let mut cv = Syllable::new("cv");
        cv.slots.push(Slot::always("C"));
        cv.slots.push(Slot::always("V"));
        spec.syllables.insert("cv".to_string(), cv);
        spec.syllable_names.push("cv".to_string());
        spec.disallowed.push(DisallowedSequence::new(["cv", "cv"]));
        spec
    }

    #[test]
    fn bounds_clamp_at_zero() {
        assert_eq!(sample().syllable_bounds(), (0, 3));
    }

    #[test]
    fn disallowed_lookup() {
        let spec = sample();
        assert!(spec.is_disallowed(&["cv", "cv"]));
        assert!(!spec.is_disallowed(&["cv"]));
    }

    #[test]
    fn syllables_follow_declaration_order() {
        let spec = sample();
        let names: Vec<_> = spec.syllables().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cv"]);
        assert!(spec.syllable("cv").is_some());
        assert!(spec.syllable("vc").is_none());
    }

    #[test]
    fn ron_round_trip() {
        let spec = sample();
        let serialized = ron::to_string(&spec).unwrap();
        let deserialized: Specification = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized.config(), spec.config());
        assert_eq!(deserialized.syllable_names(), spec.syllable_names());
        assert_eq!(deserialized.disallowed(), spec.disallowed());
    }
}
