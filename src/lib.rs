//! Lexipoeia: a word generator for constructed languages.
//!
//! A specification file declares phoneme groups, syllable templates built
//! from those groups, sequences of syllables that may not occur, and a few
//! numeric settings. The lexer turns the file into tokens, the builder turns
//! tokens into a validated `Specification`, and the generator draws words
//! from it with a seeded RNG.

pub mod core;
pub mod schema;

pub use crate::core::builder::{LoadedSpec, SpecError, SpecWarning};
pub use crate::core::generator::{GenerateError, WordGenerator};
pub use crate::schema::specification::Specification;
