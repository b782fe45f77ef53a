//! Specification loading integration tests: fixture files through the
//! threaded lexer and the builder.

use lexipoeia::core::builder::{LoadedSpec, SpecError, SpecWarning};
use lexipoeia::schema::syllable::Slot;
use lexipoeia::Specification;
use std::path::Path;

#[test]
fn polynesian_fixture_loads() {
    let loaded = LoadedSpec::load(Path::new("tests/fixtures/polynesian.lxp")).unwrap();
    assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);

    let spec = loaded.specification;
    assert_eq!(spec.syllable_names(), ["cv", "v", "mcv", "cvv"]);
    assert_eq!(
        spec.phoneme_groups()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>(),
        vec!["C", "V", "VV"]
    );
    assert!(spec.phoneme_group("C").unwrap().contains("'"));
    assert_eq!(spec.phoneme_group("VV").unwrap().members[0].tag, Some(2));
    assert_eq!(
        spec.syllable("cvv").unwrap().slots,
        vec![Slot::always("C"), Slot::new("VV", 40)]
    );
    assert_eq!(spec.disallowed().len(), 2);
    assert_eq!(spec.disallowed()[1].names, vec!["v", "mcv", "v"]);
    assert_eq!(spec.word_count(), 25);
    assert_eq!(spec.seed(), 12345);
    assert_eq!(spec.syllable_bounds(), (2, 5));
}

#[test]
fn undeclared_phoneme_group_fails_the_load() {
    let err = Specification::load(Path::new("tests/fixtures/unknown_group.lxp")).unwrap_err();
    assert!(
        matches!(&err, SpecError::UnknownPhonemeGroup { group, template } if group == "C" && template == "cv"),
        "{err}"
    );
}

#[test]
fn undeclared_template_in_disallowed_sequence_only_warns() {
    let loaded = LoadedSpec::load(Path::new("tests/fixtures/unknown_template.lxp")).unwrap();
    assert_eq!(
        loaded.warnings,
        vec![SpecWarning::UnknownSyllableTemplate("cvc".to_string())]
    );
}

#[test]
fn syntax_error_reports_position() {
    let err = Specification::load(Path::new("tests/fixtures/bad_syntax.lxp")).unwrap_err();
    match err {
        SpecError::Lex { position, message } => {
            // The vowel group runs into the '%' that opens line 3.
            assert_eq!(position.line, 3);
            assert_eq!(position.column, 1);
            assert!(message.contains("phoneme group"), "{message}");
        }
        other => panic!("expected a lexical error, got: {other}"),
    }
}

#[test]
fn error_display_includes_position() {
    let err = Specification::parse("V = a;\n  #words = x;").unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("line 2, column 12:"), "{text}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Specification::load(Path::new("tests/fixtures/missing.lxp")).unwrap_err();
    assert!(matches!(err, SpecError::Io(_)));
}
