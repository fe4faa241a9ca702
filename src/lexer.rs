//! Module `lexer` implements a one‑pass, pull‑based scanner for the language.
//!
//! It walks a byte slice and hands out one [`Token`] per call to
//! [`Lexer::next_token`], skipping whitespace between tokens. The lexer never
//! fails: a byte that no rule accepts becomes a single `ILLEGAL` token, and
//! once the input is exhausted every further call returns `EOF`.
//!
//! # Token Recognition
//!
//! - Single‑byte operators and punctuation: `= + - ! * / < > , ; ( ) { }`.
//! - Two‑byte operators `==` and `!=`, decided with one byte of lookahead.
//! - Identifiers and keywords: maximal runs of ASCII letters and `_`,
//!   resolved through the keyword table in [`crate::token`].
//! - Integers: maximal runs of ASCII digits (no sign, no fraction, no radix).
//!
//! # Example
//!
//! ```rust
//! use monkey_interp::lexer::Lexer;
//! use monkey_interp::token::TokenType;
//!
//! let mut lexer = Lexer::new("let five = 5;");
//! assert_eq!(lexer.next_token().token_type, TokenType::LET);
//! ```

use crate::token::{lookup_identifier, Token, TokenType};
use log::{debug, info, trace};
use std::iter::FusedIterator;

/// A single pass **lexer** over borrowed source text.
///
/// Instances are single‑use: the cursor only ever moves forward.
pub struct Lexer<'a> {
    src: &'a [u8],     // entire source text
    start: usize,      // index of the *first* byte of the current lexeme
    curr: usize,       // index *one past* the last byte examined
    exhausted: bool,   // iterator side: EOF has already been yielded
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Lexer created over {} bytes", src.len());

        Self {
            src: src.as_bytes(),
            start: 0,
            curr: 0,
            exhausted: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Advance one byte and return it. Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it. Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.src.get(self.curr).copied().unwrap_or(0)
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), b' ' | b'\t' | b'\r' | b'\n') {
            self.advance();
        }
    }

    /// The bytes consumed since `start`, as text.
    fn lexeme(&self) -> String {
        let slice: &[u8] = &self.src[self.start..self.curr];

        // Multi‑byte lexemes are only built from ASCII runs, so they are
        // always valid UTF‑8; a lone non‑ASCII byte is escaped instead.
        match std::str::from_utf8(slice) {
            Ok(s) => s.to_owned(),
            Err(_) => slice.iter().map(|b| format!("\\x{:02x}", b)).collect(),
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan and return the next token.
    ///
    /// After the end of input has been reached this keeps returning `EOF`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.start = self.curr;

        if self.is_at_end() {
            trace!("End of input reached at byte {}", self.curr);

            return Token::eof();
        }

        let b = self.advance();

        let tt: TokenType = match b {
            // ── single‑byte punctuators ─────────────────────────────────
            b'+' => TokenType::PLUS,
            b'-' => TokenType::MINUS,
            b'*' => TokenType::ASTERISK,
            b'/' => TokenType::SLASH,
            b'<' => TokenType::LT,
            b'>' => TokenType::GT,
            b',' => TokenType::COMMA,
            b';' => TokenType::SEMICOLON,
            b'(' => TokenType::LPAREN,
            b')' => TokenType::RPAREN,
            b'{' => TokenType::LBRACE,
            b'}' => TokenType::RBRACE,

            // ── two‑byte operators (==, !=) ─────────────────────────────
            b'=' => {
                if self.match_byte(b'=') {
                    TokenType::EQ
                } else {
                    TokenType::ASSIGN
                }
            }

            b'!' => {
                if self.match_byte(b'=') {
                    TokenType::NOT_EQ
                } else {
                    TokenType::BANG
                }
            }

            // ── integer literal ─────────────────────────────────────────
            b'0'..=b'9' => {
                while self.peek().is_ascii_digit() {
                    self.advance();
                }

                TokenType::INT
            }

            // ── identifiers / keywords ──────────────────────────────────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while is_letter(self.peek()) {
                    self.advance();
                }

                let word: &[u8] = &self.src[self.start..self.curr];

                // Letters and '_' only, so the slice is ASCII.
                match std::str::from_utf8(word) {
                    Ok(word) => lookup_identifier(word),
                    Err(_) => TokenType::IDENT,
                }
            }

            // ── anything else ───────────────────────────────────────────
            _ => {
                debug!("Illegal byte 0x{:02x} at offset {}", b, self.start);

                TokenType::ILLEGAL
            }
        };

        let token = Token::new(tt, self.lexeme());

        trace!("Scanned token {}", token);

        token
    }
}

#[inline(always)]
fn is_letter(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

// ───────────────────────── Iterator implementation ─────────────────────────

/// Yields every token up to and including the first `EOF`, then stops.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let token = self.next_token();

        if token.is(TokenType::EOF) {
            self.exhausted = true;
        }

        Some(token)
    }
}

impl<'a> FusedIterator for Lexer<'a> {}
