//! Module `scanner` implements a one‑pass, streaming lexer for the Rox language.
//!
//! It transforms UTF‑8 source text into a sequence of [`Token`]s, skipping
//! whitespace and comments, and emitting exactly one `EOF` token at the end.
//! Designed as a `FusedIterator`, it can be chained safely with other iterator
//! adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a str) -> Scanner<'a>`
//!   Create a new lexer over the source text.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token, LoxError>` on each `.next()`. Errors never stop the
//!   scan: the next call resumes right after the offending input.
//!
//! - `scan(src) -> (Vec<Token>, Vec<LoxError>)`
//!   Drains a scanner, splitting tokens from diagnostics.
//!
//! # Token Recognition
//!
//! - Single‑character tokens: `(`, `)`, `{`, `}`, `,`, `.`, `-`, `+`, `;`, `*`.
//! - Two‑character operators (maximal munch): `!=`, `==`, `<=`, `>=`.
//! - String literals: `"` … `"`, allowing multi‑line and reporting unterminated errors.
//! - Numeric literals: integer and optional fractional part (`1.` and `.5` are not numbers).
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a perfect‑hash `KEYWORDS` map.
//! - Comments are skipped in bulk with `memchr`.
//!
//! # Example
//!
//! ```rust
//! use rox::scanner::Scanner;
//!
//! let mut scanner = Scanner::new("print 123; // example");
//! for result in &mut scanner {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err) => eprintln!("{}", err),
//!     }
//! }
//! ```

use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};
use log::{info, trace};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.
pub struct Scanner<'a> {
    text: &'a str,  // entire source, for char‑aware slicing
    src: &'a [u8],  // same source viewed as bytes
    start: usize,   // first byte of the current lexeme
    curr: usize,    // one past the last byte examined
    line: usize,    // 1‑based, bumped on every '\n' outside a lexeme
    finished: bool, // EOF token already handed out
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `text`.
    #[inline]
    pub fn new(text: &'a str) -> Self {
        info!("Scanner created over {} bytes", text.len());

        Self {
            text,
            src: text.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            finished: false,
        }
    }

    // ───────────────────────────── cursor ──────────────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Byte `offset` positions ahead of the cursor, or `0` past the end.
    #[inline(always)]
    fn byte_at(&self, offset: usize) -> u8 {
        self.src.get(self.curr + offset).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn bump(&mut self) -> u8 {
        let b: u8 = self.byte_at(0);
        self.curr += 1;
        b
    }

    /// Consume the next byte when it is `expected`.
    #[inline(always)]
    fn eat(&mut self, expected: u8) -> bool {
        let hit: bool = !self.is_at_end() && self.byte_at(0) == expected;
        if hit {
            self.curr += 1;
        }
        hit
    }

    /// `long` when the next byte is `=`, else `short`.
    #[inline(always)]
    fn with_equals(&mut self, long: TokenType, short: TokenType) -> TokenType {
        if self.eat(b'=') {
            long
        } else {
            short
        }
    }

    /// `start..curr` stays on char boundaries: multi‑byte chars only ever
    /// appear inside strings or are consumed whole as errors.
    #[inline(always)]
    fn lexeme(&self) -> &'a str {
        &self.text[self.start..self.curr]
    }

    // ───────────────────────────── lexing ──────────────────────────────────

    /// Step over blanks, newlines and `//` comments.
    fn skip_trivia(&mut self) {
        while !self.is_at_end() {
            match self.byte_at(0) {
                b' ' | b'\r' | b'\t' => self.curr += 1,

                b'\n' => {
                    self.line += 1;
                    self.curr += 1;
                }

                b'/' if self.byte_at(1) == b'/' => {
                    // Stop on the newline itself; the arm above counts it.
                    self.curr = match memchr(b'\n', &self.src[self.curr..]) {
                        Some(pos) => self.curr + pos,
                        None => self.src.len(),
                    };
                }

                _ => return,
            }
        }
    }

    /// Recognise the lexeme beginning at `self.start`.
    fn scan_token(&mut self) -> Result<TokenType> {
        let kind: TokenType = match self.bump() {
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,
            b'/' => TokenType::SLASH,

            b'!' => self.with_equals(TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.with_equals(TokenType::EQUAL_EQUAL, TokenType::EQUAL),
            b'<' => self.with_equals(TokenType::LESS_EQUAL, TokenType::LESS),
            b'>' => self.with_equals(TokenType::GREATER_EQUAL, TokenType::GREATER),

            b'"' => self.string()?,
            b'0'..=b'9' => self.number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            _ => return Err(self.unexpected()),
        };

        Ok(kind)
    }

    /// Reports the character at `self.start`, consuming all of its bytes.
    fn unexpected(&mut self) -> LoxError {
        let ch: char = self.text[self.start..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);

        self.curr = self.start + ch.len_utf8();

        LoxError::lex(self.line, format!("Unexpected character: {}", ch))
    }

    /// Body of a `"…"` literal; the opening quote is already consumed.
    /// Newlines inside count toward `line`, so the token reports the line
    /// of its closing quote.
    fn string(&mut self) -> Result<TokenType> {
        loop {
            match self.byte_at(0) {
                _ if self.is_at_end() => {
                    return Err(LoxError::lex(self.line, "Unterminated string."));
                }
                b'"' => break,
                b'\n' => self.line += 1,
                _ => {}
            }
            self.curr += 1;
        }

        self.curr += 1; // closing quote

        let body: &str = &self.text[self.start + 1..self.curr - 1];

        Ok(TokenType::STRING(body.to_owned()))
    }

    /// `123` or `3.14`; a dot needs a digit after it to belong to the number.
    fn number(&mut self) -> TokenType {
        self.skip_digits();

        if self.byte_at(0) == b'.' && self.byte_at(1).is_ascii_digit() {
            self.curr += 1;
            self.skip_digits();
        }

        // Digits with at most one interior dot always parse.
        TokenType::NUMBER(self.lexeme().parse::<f64>().unwrap_or(0.0))
    }

    fn skip_digits(&mut self) {
        while self.byte_at(0).is_ascii_digit() {
            self.curr += 1;
        }
    }

    /// An identifier, or the keyword it spells.
    fn identifier(&mut self) -> TokenType {
        while matches!(self.byte_at(0), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.curr += 1;
        }

        KEYWORDS
            .get(&self.src[self.start..self.curr])
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_trivia();
        self.start = self.curr;

        if self.is_at_end() {
            self.finished = true;
            return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
        }

        let item: Result<Token> = self.scan_token().map(|kind| {
            trace!("Scanned token ({:?}) on line {}", kind, self.line);
            Token::new(kind, self.lexeme(), self.line)
        });

        Some(item)
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan `src` to completion. The token list always ends with `EOF`, even when
/// errors were found along the way.
pub fn scan(src: &str) -> (Vec<Token>, Vec<LoxError>) {
    let mut tokens: Vec<Token> = Vec::new();
    let mut errors: Vec<LoxError> = Vec::new();

    for item in Scanner::new(src) {
        match item {
            Ok(token) => tokens.push(token),
            Err(e) => errors.push(e),
        }
    }

    info!(
        "Scanned {} tokens with {} error(s)",
        tokens.len(),
        errors.len()
    );

    (tokens, errors)
}
