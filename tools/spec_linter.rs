//! Spec Linter: validates a specification file and reports quality issues.
//!
//! Usage: spec_linter <inputfile> [--dump <out.ron>]

use lexipoeia::schema::specification::Specification;
use lexipoeia::LoadedSpec;
use rustc_hash::FxHashSet;
use std::path::Path;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: spec_linter <inputfile> [--dump <out.ron>]");
        process::exit(0);
    }

    let input = &args[1];
    let mut dump = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--dump" && i + 1 < args.len() {
            i += 1;
            dump = Some(args[i].clone());
        } else {
            eprintln!("Unknown argument: {}", args[i]);
            process::exit(2);
        }
        i += 1;
    }

    let loaded = match LoadedSpec::load(Path::new(input)) {
        Ok(loaded) => loaded,
        Err(e) => {
            println!("ERROR: {}", e);
            println!("\nSummary: failed to load '{}'", input);
            process::exit(1);
        }
    };
    let spec = &loaded.specification;

    println!(
        "Loaded {} phoneme groups, {} syllable templates, {} disallowed sequences",
        spec.phoneme_groups().count(),
        spec.syllable_names().len(),
        spec.disallowed().len()
    );

    let mut warnings: Vec<String> = loaded.warnings.iter().map(|w| w.to_string()).collect();
    let (errors, lint_warnings) = lint_spec(spec);
    warnings.extend(lint_warnings);

    println!("\n=== Specification Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if let Some(path) = dump {
        let pretty = ron::ser::PrettyConfig::default();
        let written = ron::ser::to_string_pretty(spec, pretty)
            .map_err(|e| e.to_string())
            .and_then(|text| std::fs::write(&path, text).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("Compiled specification written to '{}'", path),
            Err(e) => {
                eprintln!("ERROR: could not write '{}': {}", path, e);
                process::exit(1);
            }
        }
    }

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_spec(spec: &Specification) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // A template banned on its own can never appear; if all are, no word
    // with at least one syllable can ever be drawn.
    let banned_alone: FxHashSet<&str> = spec
        .disallowed()
        .iter()
        .filter(|seq| seq.len() == 1)
        .map(|seq| seq.names[0].as_str())
        .collect();
    let pool = spec.syllable_names();
    let (_, max_syllables) = spec.syllable_bounds();
    if !pool.is_empty()
        && max_syllables > 0
        && pool.iter().all(|name| banned_alone.contains(name.as_str()))
    {
        errors.push(
            "Every syllable template is disallowed on its own; generation would never finish"
                .to_string(),
        );
    }

    if spec.word_count() == 0 {
        warnings.push("'#words' is 0 (or missing); no words would be generated".to_string());
    }

    let used: FxHashSet<&str> = spec.syllables().flat_map(|s| s.groups()).collect();
    for group in spec.phoneme_groups() {
        if !used.contains(group.name.as_str()) {
            warnings.push(format!(
                "Phoneme group '{}' is not used by any syllable template",
                group.name
            ));
        }
    }

    for syllable in spec.syllables() {
        if syllable.is_always_empty() {
            warnings.push(format!(
                "Syllable template '{}' has no slot with a chance above 0% and always comes out empty",
                syllable.name
            ));
        }
    }

    for seq in spec.disallowed() {
        if seq.len() as u64 > u64::from(max_syllables) {
            warnings.push(format!(
                "Disallowed sequence '{}' is longer than the most syllables a word can have ({}) and never applies",
                seq.names.join(" "),
                max_syllables
            ));
        }
    }

    (errors, warnings)
}
