use log::trace;
use phf::phf_map;
use serde::Serialize;
use std::fmt;

/// The different kinds of tokens recognized by the lexer.
///
/// The set is closed: every byte of input maps to exactly one of these
/// kinds, with `ILLEGAL` covering anything the language does not know.
/// `EOF` marks the end of input and is produced indefinitely once reached.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    /// A byte no lexical rule accepts
    ILLEGAL,

    /// End‑of‑input marker
    EOF,

    /// A user‑defined identifier
    IDENT,

    /// An unsigned run of decimal digits
    INT,

    /// '='
    ASSIGN,

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '!'
    BANG,

    /// '*'
    ASTERISK,

    /// '/'
    SLASH,

    /// '<'
    LT,

    /// '>'
    GT,

    /// '=='
    EQ,

    /// '!='
    NOT_EQ,

    /// ','
    COMMA,

    /// ';'
    SEMICOLON,

    /// '('
    LPAREN,

    /// ')'
    RPAREN,

    /// '{'
    LBRACE,

    /// '}'
    RBRACE,

    /// 'fn'
    FUNCTION,

    /// 'let'
    LET,

    /// 'true'
    TRUE,

    /// 'false'
    FALSE,

    /// 'if'
    IF,

    /// 'else'
    ELSE,

    /// 'return'
    RETURN,
}

impl TokenType {
    /// Variant name as used in diagnostics (`LPAREN`, `IDENT`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            TokenType::ILLEGAL => "ILLEGAL",
            TokenType::EOF => "EOF",
            TokenType::IDENT => "IDENT",
            TokenType::INT => "INT",
            TokenType::ASSIGN => "ASSIGN",
            TokenType::PLUS => "PLUS",
            TokenType::MINUS => "MINUS",
            TokenType::BANG => "BANG",
            TokenType::ASTERISK => "ASTERISK",
            TokenType::SLASH => "SLASH",
            TokenType::LT => "LT",
            TokenType::GT => "GT",
            TokenType::EQ => "EQ",
            TokenType::NOT_EQ => "NOT_EQ",
            TokenType::COMMA => "COMMA",
            TokenType::SEMICOLON => "SEMICOLON",
            TokenType::LPAREN => "LPAREN",
            TokenType::RPAREN => "RPAREN",
            TokenType::LBRACE => "LBRACE",
            TokenType::RBRACE => "RBRACE",
            TokenType::FUNCTION => "FUNCTION",
            TokenType::LET => "LET",
            TokenType::TRUE => "TRUE",
            TokenType::FALSE => "FALSE",
            TokenType::IF => "IF",
            TokenType::ELSE => "ELSE",
            TokenType::RETURN => "RETURN",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "fn"     => TokenType::FUNCTION,
    "let"    => TokenType::LET,
    "true"   => TokenType::TRUE,
    "false"  => TokenType::FALSE,
    "if"     => TokenType::IF,
    "else"   => TokenType::ELSE,
    "return" => TokenType::RETURN,
};

/// Resolve a scanned word to its keyword kind, or `IDENT` when it is not
/// reserved.
pub fn lookup_identifier(ident: &str) -> TokenType {
    let tt: TokenType = KEYWORDS.get(ident).copied().unwrap_or(TokenType::IDENT);

    trace!("Looked up identifier '{}' as {}", ident, tt);

    tt
}

/// A scanned token: its kind plus the exact text that produced it.
///
/// Tokens own their literal so that AST nodes built from them can outlive
/// the source buffer (the REPL drops each line once it has been parsed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// The substring of the source that produced this token (empty for EOF).
    pub literal: String,
}

impl Token {
    pub fn new<S: Into<String>>(token_type: TokenType, literal: S) -> Self {
        Self {
            token_type,
            literal: literal.into(),
        }
    }

    #[inline]
    pub fn eof() -> Self {
        Self::new(TokenType::EOF, "")
    }

    #[inline]
    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literal.is_empty() {
            return write!(f, "{}", self.token_type);
        }

        write!(f, "{} {}", self.token_type, self.literal)
    }
}
