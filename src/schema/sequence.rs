use serde::{Deserialize, Serialize};

/// Syllable template names that may not appear back to back in a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisallowedSequence {
    pub names: Vec<String>,
}

impl DisallowedSequence {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns true if the names occur as one contiguous run in `sequence`.
    ///
    /// An empty sequence never matches; the builder drops those anyway.
    pub fn is_contained_in<S: AsRef<str>>(&self, sequence: &[S]) -> bool {
        let n = self.names.len();
        if n == 0 || n > sequence.len() {
            return false;
        }
        sequence.windows(n).any(|window| {
            window
                .iter()
                .zip(&self.names)
                .all(|(have, banned)| have.as_ref() == banned)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_match() {
        let seq = DisallowedSequence::new(["cv", "vc"]);
        assert!(seq.is_contained_in(&["v", "cv", "vc", "v"]));
        assert!(seq.is_contained_in(&["cv", "vc"]));
    }

    #[test]
    fn split_run_does_not_match() {
        let seq = DisallowedSequence::new(["cv", "vc"]);
        assert!(!seq.is_contained_in(&["cv", "v", "vc"]));
        assert!(!seq.is_contained_in(&["vc", "cv"]));
    }

    #[test]
    fn repeated_elements() {
        // "a a b" inside "a a a b": a naive restart-on-mismatch walk misses this.
        let seq = DisallowedSequence::new(["a", "a", "b"]);
        assert!(seq.is_contained_in(&["a", "a", "a", "b"]));
        assert!(!seq.is_contained_in(&["a", "b", "a", "b"]));
    }

    #[test]
    fn longer_than_sequence() {
        let seq = DisallowedSequence::new(["a", "a", "a"]);
        assert!(!seq.is_contained_in(&["a", "a"]));
    }

    #[test]
    fn empty_never_matches() {
        let seq = DisallowedSequence::new(Vec::<String>::new());
        assert!(!seq.is_contained_in(&["a"]));
    }
}
