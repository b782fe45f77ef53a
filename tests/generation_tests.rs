//! End-to-end generation tests: load a specification, generate words, and
//! check the structural guarantees hold for arbitrary specifications.

use lexipoeia::{Specification, WordGenerator};
use proptest::prelude::*;
use std::path::Path;

fn polynesian() -> Specification {
    Specification::load(Path::new("tests/fixtures/polynesian.lxp")).unwrap()
}

#[test]
fn fixture_generates_requested_word_count() {
    let spec = polynesian();
    let mut out = Vec::new();
    let written = WordGenerator::new(&spec)
        .unwrap()
        .write_words(&mut out)
        .unwrap();
    assert_eq!(written, 25);

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with('\n'));
    let words: Vec<&str> = text.lines().collect();
    assert_eq!(words.len(), 25);
    for word in words {
        // Every template realizes at least one symbol.
        assert!(!word.is_empty());
        assert!(word.chars().all(|c| "ptkmnhwl'aeiou".contains(c)), "{word}");
    }
}

#[test]
fn fixed_seed_output_is_byte_identical() {
    let spec = polynesian();
    let mut first = Vec::new();
    let mut second = Vec::new();
    WordGenerator::new(&spec).unwrap().write_words(&mut first).unwrap();
    WordGenerator::new(&spec).unwrap().write_words(&mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn warned_specification_still_generates() {
    let spec = Specification::load(Path::new("tests/fixtures/unknown_template.lxp")).unwrap();
    let words = WordGenerator::new(&spec).unwrap().generate().unwrap();
    assert_eq!(words.len(), 5);
    for word in words {
        assert_eq!(word.chars().count(), 4, "{word}");
    }
}

#[test]
fn fixture_sequences_respect_exclusions() {
    let spec = polynesian();
    let mut generator = WordGenerator::builder(&spec).words(0).build().unwrap();
    for _ in 0..500 {
        let count = generator.syllable_count();
        let sequence = generator.syllable_sequence(count).unwrap();
        assert!(!spec.is_disallowed(&sequence), "{sequence:?}");
        assert!(!sequence.windows(2).any(|w| w == ["v", "v"]));
    }
}

/// Source text for a specification with `templates` templates. Template
/// `t0` never appears in an exclusion, so every length stays satisfiable.
fn spec_source(
    templates: usize,
    chances: &[u8],
    disallowed: &[Vec<usize>],
    mean: u32,
    low: u32,
    high: u32,
    seed: u64,
) -> String {
    let mut source = String::from("C = p t k; V = a e i o u;\n");
    for t in 0..templates {
        let chance = chances[t % chances.len()];
        source.push_str(&format!("%t{} = {}C V;\n", t, chance));
    }
    for seq in disallowed {
        let names: Vec<String> = seq
            .iter()
            .map(|i| format!("t{}", 1 + i % (templates - 1)))
            .collect();
        source.push_str(&format!("! {};\n", names.join(" ")));
    }
    source.push_str(&format!(
        "#mean = {}; #lowDeviation = {}; #highDeviation = {}; #words = 10; #seed = {};\n",
        mean, low, high, seed
    ));
    source
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_sequences_never_contain_disallowed_runs(
        templates in 2usize..5,
        chances in prop::collection::vec(0u8..=100, 1..4),
        disallowed in prop::collection::vec(prop::collection::vec(0usize..4, 1..3), 0..4),
        mean in 0u32..4,
        low in 0u32..3,
        high in 0u32..3,
        seed in any::<u64>(),
    ) {
        let source = spec_source(templates, &chances, &disallowed, mean, low, high, seed);
        let spec = Specification::parse(&source).unwrap();
        let (min, max) = spec.syllable_bounds();
        let mut generator = WordGenerator::new(&spec).unwrap();

        for _ in 0..20 {
            let count = generator.syllable_count();
            prop_assert!(((min as usize)..=(max as usize)).contains(&count));

            let sequence = generator.syllable_sequence(count).unwrap();
            prop_assert_eq!(sequence.len(), count);
            for banned in spec.disallowed() {
                prop_assert!(!banned.is_contained_in(&sequence));
            }
        }
    }

    #[test]
    fn same_seed_same_words(
        templates in 2usize..5,
        chances in prop::collection::vec(0u8..=100, 1..4),
        mean in 1u32..4,
        high in 0u32..3,
        seed in any::<u64>(),
    ) {
        let source = spec_source(templates, &chances, &[], mean, 0, high, seed);
        let spec = Specification::parse(&source).unwrap();
        let first = WordGenerator::new(&spec).unwrap().generate().unwrap();
        let second = WordGenerator::new(&spec).unwrap().generate().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn words_only_use_declared_symbols(
        templates in 2usize..5,
        chances in prop::collection::vec(0u8..=100, 1..4),
        seed in any::<u64>(),
    ) {
        let source = spec_source(templates, &chances, &[], 3, 1, 1, seed);
        let spec = Specification::parse(&source).unwrap();
        for word in WordGenerator::new(&spec).unwrap().generate().unwrap() {
            prop_assert!(word.chars().all(|c| "ptkaeiou".contains(c)), "{}", word);
        }
    }
}
