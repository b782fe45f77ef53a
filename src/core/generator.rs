//! Word generation: syllable counts, rejection-sampled syllable sequences,
//! and slot realization.
//!
//! Every random draw goes through the generator's own RNG in a fixed order,
//! so a seed fully determines the output.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::io::Write;
use thiserror::Error;

use crate::schema::specification::Specification;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no syllable templates are declared, so no words can be generated")]
    EmptyPool,
    #[error("syllable template '{0}' is not declared")]
    UnknownSyllable(String),
    #[error("phoneme group '{0}' is not declared")]
    UnknownPhonemeGroup(String),
    #[error("phoneme group '{0}' has no members")]
    EmptyPhonemeGroup(String),
}

/// Generates words from a specification.
pub struct WordGenerator<'a, R = StdRng> {
    spec: &'a Specification,
    rng: R,
    words: usize,
}

/// Builder for a `WordGenerator`. Unset options fall back to the
/// `#seed` and `#words` values of the specification.
pub struct WordGeneratorBuilder<'a> {
    spec: &'a Specification,
    seed: Option<u64>,
    words: Option<usize>,
}

impl<'a> WordGenerator<'a, StdRng> {
    pub fn builder(spec: &'a Specification) -> WordGeneratorBuilder<'a> {
        WordGeneratorBuilder {
            spec,
            seed: None,
            words: None,
        }
    }

    /// A generator seeded and sized from the specification alone.
    pub fn new(spec: &'a Specification) -> Result<Self, GenerateError> {
        Self::builder(spec).build()
    }
}

impl<'a> WordGeneratorBuilder<'a> {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn words(mut self, words: usize) -> Self {
        self.words = Some(words);
        self
    }

    pub fn build(self) -> Result<WordGenerator<'a, StdRng>, GenerateError> {
        let seed = self.seed.unwrap_or_else(|| self.spec.seed());
        self.build_with_rng(StdRng::seed_from_u64(seed))
    }

    /// Build around a caller-supplied random source. Any `seed` set on the
    /// builder is ignored.
    pub fn build_with_rng<R: Rng>(self, rng: R) -> Result<WordGenerator<'a, R>, GenerateError> {
        let words = self
            .words
            .unwrap_or_else(|| self.spec.word_count() as usize);
        if words > 0 && self.spec.syllable_names().is_empty() {
            return Err(GenerateError::EmptyPool);
        }
        Ok(WordGenerator {
            spec: self.spec,
            rng,
            words,
        })
    }
}

impl<'a, R: Rng> WordGenerator<'a, R> {
    /// Number of words `generate` and `write_words` produce.
    pub fn word_count(&self) -> usize {
        self.words
    }

    /// Draw how many syllables the next word gets.
    ///
    /// The lower bound is `mean` minus a draw from `[0, lowDeviation]`, the
    /// upper bound `mean` plus a draw from `[0, highDeviation]`; a zero
    /// deviation skips its draw. Equal bounds give the count directly,
    /// otherwise it is drawn from `[low, high)`.
    pub fn syllable_count(&mut self) -> usize {
        let mean = i64::from(self.spec.mean_syllables());
        let low_deviation = i64::from(self.spec.low_deviation());
        let high_deviation = i64::from(self.spec.high_deviation());

        let low = if low_deviation == 0 {
            mean
        } else {
            mean - self.rng.gen_range(0..=low_deviation)
        };
        let high = if high_deviation == 0 {
            mean
        } else {
            mean + self.rng.gen_range(0..=high_deviation)
        };

        let low = low.max(0);
        let count = if low >= high {
            low
        } else {
            self.rng.gen_range(low..high)
        };
        count as usize
    }

    /// Draw `count` template names, starting over until no disallowed
    /// sequence occurs in the result.
    ///
    /// There is no retry limit: a specification whose exclusions rule out
    /// every sequence of this length never returns.
    pub fn syllable_sequence(&mut self, count: usize) -> Result<Vec<&'a str>, GenerateError> {
        let spec = self.spec;
        let pool = spec.syllable_names();
        if count > 0 && pool.is_empty() {
            return Err(GenerateError::EmptyPool);
        }

        let mut sequence = Vec::with_capacity(count);
        loop {
            sequence.clear();
            for _ in 0..count {
                let name = pool.choose(&mut self.rng).ok_or(GenerateError::EmptyPool)?;
                sequence.push(name.as_str());
            }
            if !spec.is_disallowed(&sequence) {
                return Ok(sequence);
            }
        }
    }

    /// Realize one instance of the named template onto the end of `word`.
    pub fn realize_syllable(&mut self, name: &str, word: &mut String) -> Result<(), GenerateError> {
        let spec = self.spec;
        let syllable = spec
            .syllable(name)
            .ok_or_else(|| GenerateError::UnknownSyllable(name.to_string()))?;

        for slot in &syllable.slots {
            let roll: u8 = self.rng.gen_range(0..100);
            if roll >= slot.chance {
                continue;
            }
            let group = spec
                .phoneme_group(&slot.group)
                .ok_or_else(|| GenerateError::UnknownPhonemeGroup(slot.group.clone()))?;
            let phoneme = group
                .members
                .choose(&mut self.rng)
                .ok_or_else(|| GenerateError::EmptyPhonemeGroup(group.name.clone()))?;
            word.push_str(&phoneme.symbol);
        }
        Ok(())
    }

    pub fn next_word(&mut self) -> Result<String, GenerateError> {
        let count = self.syllable_count();
        let sequence = self.syllable_sequence(count)?;
        let mut word = String::new();
        for name in sequence {
            self.realize_syllable(name, &mut word)?;
        }
        Ok(word)
    }

    /// Generate `word_count()` words in memory.
    pub fn generate(&mut self) -> Result<Vec<String>, GenerateError> {
        (0..self.words).map(|_| self.next_word()).collect()
    }

    /// Write `word_count()` words to `out`, one per line.
    pub fn write_words<W: Write>(&mut self, out: &mut W) -> Result<usize, GenerateError> {
        for _ in 0..self.words {
            let word = self.next_word()?;
            writeln!(out, "{}", word)?;
        }
        out.flush()?;
        debug!("wrote {} words", self.words);
        Ok(self.words)
    }
}
