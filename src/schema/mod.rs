pub mod phoneme;
pub mod sequence;
pub mod specification;
pub mod syllable;
