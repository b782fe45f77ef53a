//! Lexipoeia: generate words from a specification file.
//!
//! Usage: lexipoeia <inputfile> [outputfile] [--seed <n>] [--words <n>]
//!
//! Words go to `<inputfile>.words` unless an output file is given; `-`
//! writes them to standard output.

use lexipoeia::{GenerateError, Specification, WordGenerator};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;

const USAGE: &str = "Usage: lexipoeia <inputfile> [outputfile] [--seed <n>] [--words <n>]";

fn usage_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("{}", USAGE);
    process::exit(2);
}

fn parse_flag<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    let Some(value) = value else {
        usage_error(&format!("{} needs a value", flag));
    };
    value
        .parse()
        .unwrap_or_else(|_| usage_error(&format!("{} must be a non-negative integer", flag)))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut positional = Vec::new();
    let mut seed = None;
    let mut words = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_flag::<u64>("--seed", args.get(i)));
            }
            "--words" => {
                i += 1;
                words = Some(parse_flag::<usize>("--words", args.get(i)));
            }
            other if other.starts_with("--") => usage_error(&format!("unknown argument: {}", other)),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let input = match positional.as_slice() {
        [] => usage_error("an input file is required"),
        [input] | [input, _] => input.clone(),
        _ => usage_error("too many arguments"),
    };
    let output = positional
        .get(1)
        .cloned()
        .unwrap_or_else(|| format!("{}.words", input));

    let spec = Specification::load(Path::new(&input)).unwrap_or_else(|e| {
        eprintln!("Error loading '{}': {}", input, e);
        process::exit(1);
    });

    let mut builder = WordGenerator::builder(&spec);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    if let Some(words) = words {
        builder = builder.words(words);
    }
    let mut generator = builder.build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let result = if output == "-" {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        generator.write_words(&mut out)
    } else {
        write_to_file(&mut generator, &output)
    };

    match result {
        Ok(written) => log::info!("generated {} words into {}", written, output),
        Err(e) => {
            eprintln!("Error writing words to '{}': {}", output, e);
            process::exit(1);
        }
    }
}

fn write_to_file(generator: &mut WordGenerator<'_>, path: &str) -> Result<usize, GenerateError> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let written = generator.write_words(&mut out)?;
    out.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(written)
}
