//! Builds a validated `Specification` from a token stream.

use log::{debug, warn};
use rustc_hash::FxHashSet;
use std::path::Path;
use thiserror::Error;

use crate::core::lexer::{Position, Token, TokenKind, TokenStream};
use crate::schema::phoneme::{Phoneme, PhonemeGroup};
use crate::schema::sequence::DisallowedSequence;
use crate::schema::specification::Specification;
use crate::schema::syllable::{Slot, Syllable, ALWAYS};

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("{position}: {message}")]
    Lex { position: Position, message: String },
    #[error("{position}: bad number format: {text}")]
    BadNumber { position: Position, text: String },
    #[error("{position}: chance of {value}% in syllable template '{template}' is greater than 100%")]
    PercentOutOfRange {
        position: Position,
        template: String,
        value: u64,
    },
    #[error("{position}: expected a phoneme group name in syllable template '{template}', found {found}")]
    ExpectedPhonemeGroup {
        position: Position,
        template: String,
        found: String,
    },
    #[error("{position}: unknown config variable '{name}'")]
    UnknownConfig { position: Position, name: String },
    #[error("name '{group}' in syllable template '{template}' is not a defined phoneme group name")]
    UnknownPhonemeGroup { group: String, template: String },
    #[error("phoneme group '{0}' has no members")]
    EmptyPhonemeGroup(String),
    #[error("{position}: unexpected {found}")]
    UnexpectedToken { position: Position, found: String },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems that do not stop a specification from loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecWarning {
    #[error("name '{0}' in a disallowed sequence is not a syllable template name")]
    UnknownSyllableTemplate(String),
    #[error("{0}: empty disallowed sequence ignored")]
    EmptyDisallowedSequence(Position),
    #[error("phoneme group '{0}' declared more than once; the last declaration wins")]
    RedeclaredPhonemeGroup(String),
    #[error("syllable template '{0}' declared more than once; the last declaration wins")]
    RedeclaredSyllableTemplate(String),
}

/// A loaded specification together with the warnings raised building it.
#[derive(Debug, Clone)]
pub struct LoadedSpec {
    pub specification: Specification,
    pub warnings: Vec<SpecWarning>,
}

impl LoadedSpec {
    /// Lex (on a separate thread) and build a specification from source text.
    pub fn parse(source: &str) -> Result<LoadedSpec, SpecError> {
        SpecBuilder::new(TokenStream::spawn(source)).build()
    }

    /// Read a specification file and build it.
    pub fn load(path: &Path) -> Result<LoadedSpec, SpecError> {
        let source = std::fs::read_to_string(path)?;
        debug!("loaded {} bytes from {}", source.len(), path.display());
        Self::parse(&source)
    }
}

impl Specification {
    /// Build a specification from source text. Warnings are only logged.
    pub fn parse(source: &str) -> Result<Specification, SpecError> {
        LoadedSpec::parse(source).map(|loaded| loaded.specification)
    }

    /// Build a specification from a file. Warnings are only logged.
    pub fn load(path: &Path) -> Result<Specification, SpecError> {
        LoadedSpec::load(path).map(|loaded| loaded.specification)
    }
}

/// Consumes tokens one declaration at a time.
pub struct SpecBuilder<I> {
    tokens: I,
    spec: Specification,
    warnings: Vec<SpecWarning>,
}

impl<I: Iterator<Item = Token>> SpecBuilder<I> {
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            spec: Specification::default(),
            warnings: Vec::new(),
        }
    }

    /// Drain the token stream, then validate cross references.
    pub fn build(mut self) -> Result<LoadedSpec, SpecError> {
        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::PhonemeVariable => self.phoneme_group(token)?,
                TokenKind::SyllableVariable => self.syllable(token)?,
                TokenKind::Disallowed => self.disallowed(token)?,
                TokenKind::ConfigVariable => self.config(token)?,
                _ => return Err(unexpected(&token)),
            }
        }

        self.validate()?;

        debug!(
            "built specification: {} phoneme groups, {} syllable templates, {} disallowed sequences",
            self.spec.phoneme_names.len(),
            self.spec.syllable_names.len(),
            self.spec.disallowed.len()
        );

        Ok(LoadedSpec {
            specification: self.spec,
            warnings: self.warnings,
        })
    }

    /// Next token, turning lexer errors and a truncated stream into errors.
    fn next_token(&mut self) -> Result<Token, SpecError> {
        let token = self.tokens.next().ok_or(SpecError::UnexpectedEnd)?;
        if token.kind == TokenKind::Error {
            return Err(SpecError::Lex {
                position: token.position,
                message: token.text,
            });
        }
        Ok(token)
    }

    fn warn(&mut self, warning: SpecWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn phoneme_group(&mut self, name: Token) -> Result<(), SpecError> {
        let mut group = PhonemeGroup::new(name.text);
        // Only a number right after a symbol is a tag.
        let mut tag_allowed = false;

        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::EndDeclaration => break,
                TokenKind::Variable => {
                    group.members.push(Phoneme::new(token.text));
                    tag_allowed = true;
                }
                TokenKind::Number if tag_allowed => {
                    let tag = parse_number(&token)?;
                    if let Some(last) = group.members.last_mut() {
                        last.tag = Some(tag);
                    }
                    tag_allowed = false;
                }
                _ => return Err(unexpected(&token)),
            }
        }

        if group.is_empty() {
            return Err(SpecError::EmptyPhonemeGroup(group.name));
        }

        let name = group.name.clone();
        if self.spec.phoneme_groups.insert(name.clone(), group).is_some() {
            self.warn(SpecWarning::RedeclaredPhonemeGroup(name));
        } else {
            self.spec.phoneme_names.push(name);
        }
        Ok(())
    }

    fn syllable(&mut self, name: Token) -> Result<(), SpecError> {
        let mut syllable = Syllable::new(name.text);

        loop {
            let token = self.next_token()?;
            let (chance, group) = match token.kind {
                TokenKind::EndDeclaration => break,
                TokenKind::Variable => (ALWAYS, token),
                TokenKind::Number => {
                    let value: u64 = parse_number(&token)?;
                    if value > u64::from(ALWAYS) {
                        return Err(SpecError::PercentOutOfRange {
                            position: token.position,
                            template: syllable.name,
                            value,
                        });
                    }
                    let group = self.next_token()?;
                    if group.kind != TokenKind::Variable {
                        return Err(SpecError::ExpectedPhonemeGroup {
                            position: group.position,
                            template: syllable.name,
                            found: group.to_string(),
                        });
                    }
                    // Checked against ALWAYS above.
                    (value as u8, group)
                }
                _ => {
                    return Err(SpecError::ExpectedPhonemeGroup {
                        position: token.position,
                        template: syllable.name,
                        found: token.to_string(),
                    })
                }
            };
            syllable.slots.push(Slot::new(group.text, chance));
        }

        let name = syllable.name.clone();
        if self.spec.syllables.insert(name.clone(), syllable).is_some() {
            self.warn(SpecWarning::RedeclaredSyllableTemplate(name));
        } else {
            self.spec.syllable_names.push(name);
        }
        Ok(())
    }

    fn disallowed(&mut self, bang: Token) -> Result<(), SpecError> {
        let mut names = Vec::new();
        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::EndDeclaration => break,
                TokenKind::Variable => names.push(token.text),
                _ => return Err(unexpected(&token)),
            }
        }

        if names.is_empty() {
            self.warn(SpecWarning::EmptyDisallowedSequence(bang.position));
        } else {
            self.spec.disallowed.push(DisallowedSequence { names });
        }
        Ok(())
    }

    fn config(&mut self, name: Token) -> Result<(), SpecError> {
        let value = self.next_token()?;
        if value.kind != TokenKind::Number {
            return Err(unexpected(&value));
        }

        let config = &mut self.spec.config;
        match name.text.as_str() {
            "mean" => config.mean = parse_number(&value)?,
            "lowDeviation" => config.low_deviation = parse_number(&value)?,
            "highDeviation" => config.high_deviation = parse_number(&value)?,
            "words" => config.words = parse_number(&value)?,
            "seed" => config.seed = parse_number(&value)?,
            _ => {
                return Err(SpecError::UnknownConfig {
                    position: name.position,
                    name: name.text,
                })
            }
        }

        let end = self.next_token()?;
        if end.kind != TokenKind::EndDeclaration {
            return Err(unexpected(&end));
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<(), SpecError> {
        let mut unknown = Vec::new();
        let mut seen = FxHashSet::default();
        for sequence in &self.spec.disallowed {
            for name in &sequence.names {
                if !self.spec.syllables.contains_key(name) && seen.insert(name.as_str()) {
                    unknown.push(name.clone());
                }
            }
        }
        for name in unknown {
            self.warn(SpecWarning::UnknownSyllableTemplate(name));
        }

        for syllable in self.spec.syllables() {
            for group in syllable.groups() {
                if self.spec.phoneme_group(group).is_none() {
                    return Err(SpecError::UnknownPhonemeGroup {
                        group: group.to_string(),
                        template: syllable.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(token: &Token) -> Result<T, SpecError> {
    token.text.parse().map_err(|_| SpecError::BadNumber {
        position: token.position,
        text: token.text.clone(),
    })
}

fn unexpected(token: &Token) -> SpecError {
    SpecError::UnexpectedToken {
        position: token.position,
        found: token.to_string(),
    }
}
