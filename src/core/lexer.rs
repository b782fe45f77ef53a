//! Tokenizer for the phonotactics language.
//!
//! The lexer is a small state machine: each step either emits one token
//! (the text consumed since the previous emission) or moves to another
//! state. `Lexer` runs it on demand as an iterator; `TokenStream` runs it on
//! its own thread and hands tokens over one at a time.

use std::fmt;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Name of a phoneme group being declared.
    PhonemeVariable,
    /// Name of a syllable template being declared (after `%`).
    SyllableVariable,
    /// Name of a config setting being declared (after `#`).
    ConfigVariable,
    /// An identifier inside a declaration body. Its meaning depends on
    /// the declaration: phoneme symbol, group name, or template name.
    Variable,
    /// The `!` opening a disallowed sequence.
    Disallowed,
    Number,
    EndDeclaration,
    Eof,
    /// Lexing failed; the token text is the message. Always the last token.
    Error,
}

/// 1-based line and column, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Error => write!(f, "{}", self.text),
            _ => write!(f, "{:?}", self.text),
        }
    }
}

/// Characters that may appear in symbols and names.
pub fn is_identifier_char(c: char) -> bool {
    !c.is_whitespace()
        && !c.is_ascii_digit()
        && !matches!(c, ';' | '(' | ')' | '#' | '!' | '%' | '=' | ':')
}

/// Which body follows the `=`/`:` of a named declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    Phoneme,
    Syllable,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Declaration,
    Assign(Body),
    PhonemeBody,
    PhonemeTag,
    SyllableBody,
    SlotGroup,
    DisallowedBody,
    ConfigValue,
    ConfigEnd,
    Done,
}

/// Synchronous lexer. Yields tokens until `Eof` or `Error`, then `None`.
pub struct Lexer<'a> {
    input: &'a str,
    start: usize,
    pos: usize,
    start_position: Position,
    position: Position,
    state: State,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            start: 0,
            pos: 0,
            start_position: Position::default(),
            position: Position::default(),
            state: State::Declaration,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    fn accept(&mut self, valid: &str) -> bool {
        match self.peek() {
            Some(c) if valid.contains(c) => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    /// Consume characters while `pred` holds; returns how many were taken.
    fn accept_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut taken = 0;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
            taken += 1;
        }
        taken
    }

    fn ignore(&mut self) {
        self.start = self.pos;
        self.start_position = self.position;
    }

    fn emit(&mut self, kind: TokenKind) -> Token {
        let token = Token {
            kind,
            text: self.input[self.start..self.pos].to_string(),
            position: self.start_position,
        };
        self.ignore();
        token
    }

    fn error(&mut self, message: String) -> Token {
        self.state = State::Done;
        Token {
            kind: TokenKind::Error,
            text: message,
            position: self.position,
        }
    }

    fn found(&self) -> String {
        match self.peek() {
            Some(c) => format!("'{}'", c.escape_debug()),
            None => "end of input".to_string(),
        }
    }

    /// Skip whitespace and `( ... )` comments.
    fn skip_blank(&mut self) {
        loop {
            self.accept_while(char::is_whitespace);
            if !self.accept("(") {
                break;
            }
            self.accept_while(|c| c != ')');
            self.accept(")");
        }
        self.ignore();
    }

    fn end_declaration(&mut self) -> Token {
        self.bump();
        self.state = State::Declaration;
        self.emit(TokenKind::EndDeclaration)
    }

    fn unterminated(&mut self, what: &str) -> Token {
        self.error(format!("unterminated {} declaration: expected ';'", what))
    }

    fn declaration_name(&mut self, kind: TokenKind, body: Body, what: &str) -> Token {
        if self.accept_while(is_identifier_char) == 0 {
            let found = self.found();
            return self.error(format!("expected a {} name, found {}", what, found));
        }
        self.state = State::Assign(body);
        self.emit(kind)
    }

    /// Run one state. Returns the token it emitted, if any.
    fn step(&mut self) -> Option<Token> {
        match self.state {
            State::Done => None,
            State::Declaration => {
                self.skip_blank();
                let token = match self.peek() {
                    None => {
                        self.state = State::Done;
                        self.emit(TokenKind::Eof)
                    }
                    Some(c) if is_identifier_char(c) => {
                        self.declaration_name(TokenKind::PhonemeVariable, Body::Phoneme, "phoneme group")
                    }
                    Some('%') => {
                        self.bump();
                        self.ignore();
                        self.declaration_name(TokenKind::SyllableVariable, Body::Syllable, "syllable template")
                    }
                    Some('#') => {
                        self.bump();
                        self.ignore();
                        self.declaration_name(TokenKind::ConfigVariable, Body::Config, "config")
                    }
                    Some('!') => {
                        self.bump();
                        self.state = State::DisallowedBody;
                        self.emit(TokenKind::Disallowed)
                    }
                    Some(c) => {
                        self.error(format!("bad beginning of declaration: '{}'", c.escape_debug()))
                    }
                };
                Some(token)
            }
            State::Assign(body) => {
                self.skip_blank();
                if !self.accept("=:") {
                    let found = self.found();
                    return Some(self.error(format!(
                        "expected '=' or ':' after variable name, found {}",
                        found
                    )));
                }
                self.ignore();
                self.state = match body {
                    Body::Phoneme => State::PhonemeBody,
                    Body::Syllable => State::SyllableBody,
                    Body::Config => State::ConfigValue,
                };
                None
            }
            State::PhonemeBody => {
                self.skip_blank();
                let token = match self.peek() {
                    Some(';') => self.end_declaration(),
                    Some(c) if is_identifier_char(c) => {
                        self.accept_while(is_identifier_char);
                        self.state = State::PhonemeTag;
                        self.emit(TokenKind::Variable)
                    }
                    None => self.unterminated("phoneme group"),
                    Some(_) => {
                        let found = self.found();
                        self.error(format!(
                            "expected a phoneme symbol or ';' in phoneme group declaration, found {}",
                            found
                        ))
                    }
                };
                Some(token)
            }
            State::PhonemeTag => {
                // Digits glued to a symbol are its tag.
                self.state = State::PhonemeBody;
                if self.accept_while(|c| c.is_ascii_digit()) > 0 {
                    Some(self.emit(TokenKind::Number))
                } else {
                    None
                }
            }
            State::SyllableBody => {
                self.skip_blank();
                let token = match self.peek() {
                    Some(';') => self.end_declaration(),
                    Some(c) if c.is_ascii_digit() => {
                        self.accept_while(|c| c.is_ascii_digit());
                        self.state = State::SlotGroup;
                        self.emit(TokenKind::Number)
                    }
                    Some(c) if is_identifier_char(c) => {
                        self.accept_while(is_identifier_char);
                        self.emit(TokenKind::Variable)
                    }
                    None => self.unterminated("syllable template"),
                    Some(_) => {
                        let found = self.found();
                        self.error(format!(
                            "expected a percentage, phoneme group name or ';' in syllable template declaration, found {}",
                            found
                        ))
                    }
                };
                Some(token)
            }
            State::SlotGroup => {
                self.skip_blank();
                if self.accept_while(is_identifier_char) == 0 {
                    let found = self.found();
                    return Some(self.error(format!(
                        "expected a phoneme group name after percentage, found {}",
                        found
                    )));
                }
                self.state = State::SyllableBody;
                Some(self.emit(TokenKind::Variable))
            }
            State::DisallowedBody => {
                self.skip_blank();
                let token = match self.peek() {
                    Some(';') => self.end_declaration(),
                    Some(c) if is_identifier_char(c) => {
                        self.accept_while(is_identifier_char);
                        self.emit(TokenKind::Variable)
                    }
                    None => self.unterminated("disallowed sequence"),
                    Some(_) => {
                        let found = self.found();
                        self.error(format!(
                            "expected a syllable template name or ';' in disallowed sequence, found {}",
                            found
                        ))
                    }
                };
                Some(token)
            }
            State::ConfigValue => {
                self.skip_blank();
                if self.accept_while(|c| c.is_ascii_digit()) == 0 {
                    let found = self.found();
                    return Some(self.error(format!(
                        "config values must be non-negative integers, found {}",
                        found
                    )));
                }
                self.state = State::ConfigEnd;
                Some(self.emit(TokenKind::Number))
            }
            State::ConfigEnd => {
                self.skip_blank();
                if self.peek() == Some(';') {
                    return Some(self.end_declaration());
                }
                let found = self.found();
                Some(self.error(format!(
                    "expected ';' to terminate config declaration, found {}",
                    found
                )))
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.state != State::Done {
            if let Some(token) = self.step() {
                return Some(token);
            }
        }
        None
    }
}

/// A lexer running on its own thread.
///
/// Tokens cross a rendezvous channel: the lexer blocks after producing a
/// token until the consumer takes it, so at most one token is in flight and
/// order is exactly that of `Lexer`. Dropping the stream early disconnects
/// the channel, which stops the lexer thread.
pub struct TokenStream {
    receiver: Option<Receiver<Token>>,
    worker: Option<JoinHandle<()>>,
}

impl TokenStream {
    pub fn spawn(source: impl Into<String>) -> Self {
        let source = source.into();
        let (sender, receiver) = mpsc::sync_channel(0);
        let worker = thread::spawn(move || {
            for token in Lexer::new(&source) {
                if sender.send(token).is_err() {
                    break;
                }
            }
        });
        Self {
            receiver: Some(receiver),
            worker: Some(worker),
        }
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.receiver.as_ref()?.recv().ok()
    }
}

impl Drop for TokenStream {
    fn drop(&mut self) {
        drop(self.receiver.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("lexer thread panicked");
            }
        }
    }
}
