/*!
Pratt parser turning a token stream into a [`Program`].

Overview
--------

The parser pulls tokens from a [`Lexer`] on demand and keeps exactly two of
them in view: the current token and one token of lookahead (`peek`). Every
production starts with the current token sitting on its first token and
leaves it on its last one; the caller advances past it.

### Time & Space

| Phase / function          | Cost | Rationale                                          |
|---------------------------|-----:|----------------------------------------------------|
| `parse_program` main loop | Θ(n) | Each token is pulled from the lexer exactly once.  |
| `parse_expression`        | O(1) per token | Binding powers decide without backtracking. |

Call‑stack depth grows with syntactic nesting; `parse_expression` runs
through [`ensure_sufficient_stack`] so deep nesting grows the stack instead
of overflowing it.

### Logging Policy

| Location                      | Level   | Purpose                                     |
|-------------------------------|---------|---------------------------------------------|
| `Parser::new`, `parse_program`| `info`  | Lifecycle milestones.                       |
| statement productions         | `debug` | High‑level descent into grammar branches.   |
| error paths                   | `debug` | Each message as it is recorded.             |

--------------------------------------------------------------------------------
Grammar (EBNF)
--------------

```text
program     → statement* EOF ;
statement   → letStmt | returnStmt | block | exprStmt ;
letStmt     → "let" IDENT "=" expression ";"? ;
returnStmt  → "return" expression ";"? ;
exprStmt    → expression ";"? ;
block       → "{" statement* "}" ;
expression  → prefix ( infix )* ;                      (Pratt loop)
prefix      → IDENT | INT | "true" | "false"
            | ( "!" | "-" ) expression
            | "(" expression ")"
            | "if" "(" expression ")" block ( "else" block )?
            | "fn" "(" ( IDENT ( "," IDENT )* )? ")" block ;
infix       → ( "==" | "!=" | "<" | ">" | "+" | "-" | "*" | "/" ) expression
            | "(" ( expression ( "," expression )* )? ")" ;
```

Error policy
------------

Structural problems never abort the parse. Each one appends a message to
[`Parser::errors`], the construct being built is dropped, and parsing resumes
from wherever the cursor stopped. A non‑empty error list means the returned
tree must not be evaluated.
*/

use std::rc::Rc;

use log::{debug, info, trace};

use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::lexer::Lexer;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};

/// Binding power of an operator, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `==` `!=`
    Equals,
    /// `<` `>`
    LessGreater,
    /// `+` `-`
    Sum,
    /// `*` `/`
    Product,
    /// `-x` `!x`
    Prefix,
    /// `f(x)`
    Call,
}

impl Precedence {
    /// Infix binding power of a token kind; `Lowest` for anything that is
    /// not an infix operator.
    pub fn of(token_type: TokenType) -> Self {
        match token_type {
            TokenType::EQ | TokenType::NOT_EQ => Precedence::Equals,
            TokenType::LT | TokenType::GT => Precedence::LessGreater,
            TokenType::PLUS | TokenType::MINUS => Precedence::Sum,
            TokenType::ASTERISK | TokenType::SLASH => Precedence::Product,
            TokenType::LPAREN => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// Top‑level parser over a lexer.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    errors: Vec<String>,

    cur_token: Token,
    peek_token: Token,
}

/// Lex and parse `source` in one step.
///
/// An empty error list means the program is safe to evaluate.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    (program, parser.into_errors())
}

impl<'a> Parser<'a> {
    /// Construct a parser and prime the current and peek tokens.
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();

        info!(
            "Parser created (first tokens: {} / {})",
            cur_token.token_type, peek_token.token_type
        );

        Self {
            lexer,
            errors: Vec::new(),
            cur_token,
            peek_token,
        }
    }

    /// Messages recorded so far, in the order they were found.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse statements until end of input.
    pub fn parse_program(&mut self) -> Program {
        info!("Beginning parse phase");

        let mut program = Program::default();

        while !self.cur_token_is(TokenType::EOF) {
            if let Some(stmt) = self.parse_statement() {
                debug!("Parsed statement: {}", stmt);

                program.statements.push(stmt);
            }

            self.next_token();
        }

        info!(
            "Parsed {} statement(s) with {} error(s)",
            program.statements.len(),
            self.errors.len()
        );

        program
    }

    // ───────────────────────── statement rules ────────────────────

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.token_type {
            TokenType::LET => self.parse_let_statement(),
            TokenType::RETURN => self.parse_return_statement(),
            TokenType::LBRACE => Some(Statement::Block(self.parse_block_statement())),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        debug!("Entering let statement");

        let token = self.cur_token.clone();

        self.expect_peek(TokenType::IDENT)?;

        let name = Identifier::new(self.cur_token.clone());

        self.expect_peek(TokenType::ASSIGN)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        debug!("Entering return statement");

        let token = self.cur_token.clone();

        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(Statement::Expression { token, expression })
    }

    /// Current token is the `{`. Stops on the matching `}` (or EOF).
    fn parse_block_statement(&mut self) -> BlockStatement {
        debug!("Entering block");

        let token = self.cur_token.clone();
        let mut statements: Vec<Statement> = Vec::new();

        self.next_token();

        while !self.cur_token_is(TokenType::RBRACE) && !self.cur_token_is(TokenType::EOF) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }

            self.next_token();
        }

        BlockStatement { token, statements }
    }

    // ─────────────────────── expression rules (Pratt) ─────────────

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        ensure_sufficient_stack(|| self.parse_expression_inner(precedence))
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_token_is(TokenType::SEMICOLON) && precedence < self.peek_precedence() {
            let is_call = match self.peek_token.token_type {
                TokenType::PLUS
                | TokenType::MINUS
                | TokenType::ASTERISK
                | TokenType::SLASH
                | TokenType::EQ
                | TokenType::NOT_EQ
                | TokenType::LT
                | TokenType::GT => false,
                TokenType::LPAREN => true,
                _ => return Some(left),
            };

            self.next_token();

            left = if is_call {
                self.parse_call_expression(left)?
            } else {
                self.parse_infix_expression(left)?
            };
        }

        Some(left)
    }

    /// Dispatch on the token that begins an expression.
    fn parse_prefix(&mut self) -> Option<Expression> {
        trace!("Prefix dispatch on {}", self.cur_token.token_type);

        match self.cur_token.token_type {
            TokenType::IDENT => Some(Expression::Identifier(Identifier::new(
                self.cur_token.clone(),
            ))),
            TokenType::INT => self.parse_integer_literal(),
            TokenType::TRUE | TokenType::FALSE => Some(Expression::Boolean {
                token: self.cur_token.clone(),
                value: self.cur_token_is(TokenType::TRUE),
            }),
            TokenType::BANG | TokenType::MINUS => self.parse_prefix_expression(),
            TokenType::LPAREN => self.parse_grouped_expression(),
            TokenType::IF => self.parse_if_expression(),
            TokenType::FUNCTION => self.parse_function_literal(),
            other => {
                self.push_error(format!("no prefix parse function for {} found", other));

                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();

        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral { token, value }),
            Err(_) => {
                self.push_error(format!("could not parse {:?} as integer", token.literal));

                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();

        self.next_token();

        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    /// Current token is the operator; `left` was parsed before it.
    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        let precedence = self.cur_precedence();

        self.next_token();

        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();

        let expr = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenType::RPAREN)?;

        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        debug!("Entering if expression");

        let token = self.cur_token.clone();

        self.expect_peek(TokenType::LPAREN)?;
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenType::RPAREN)?;
        self.expect_peek(TokenType::LBRACE)?;

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token_is(TokenType::ELSE) {
            self.next_token();
            self.expect_peek(TokenType::LBRACE)?;

            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        debug!("Entering function literal");

        let token = self.cur_token.clone();

        self.expect_peek(TokenType::LPAREN)?;

        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenType::LBRACE)?;

        let body = self.parse_block_statement();

        Some(Expression::Function {
            token,
            parameters: parameters.into(),
            body: Rc::new(body),
        })
    }

    /// Current token is the `(`. Leaves the cursor on the `)`.
    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut identifiers: Vec<Identifier> = Vec::new();

        if self.peek_token_is(TokenType::RPAREN) {
            self.next_token();

            return Some(identifiers);
        }

        self.expect_peek(TokenType::IDENT)?;
        identifiers.push(Identifier::new(self.cur_token.clone()));

        while self.peek_token_is(TokenType::COMMA) {
            self.next_token();
            self.expect_peek(TokenType::IDENT)?;

            identifiers.push(Identifier::new(self.cur_token.clone()));
        }

        self.expect_peek(TokenType::RPAREN)?;

        Some(identifiers)
    }

    /// Current token is the `(` acting as an infix operator.
    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let arguments = self.parse_call_arguments()?;

        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut args: Vec<Expression> = Vec::new();

        if self.peek_token_is(TokenType::RPAREN) {
            self.next_token();

            return Some(args);
        }

        self.next_token();
        args.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenType::COMMA) {
            self.next_token();
            self.next_token();

            args.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(TokenType::RPAREN)?;

        Some(args)
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    #[inline(always)]
    fn cur_token_is(&self, ttype: TokenType) -> bool {
        self.cur_token.is(ttype)
    }

    #[inline(always)]
    fn peek_token_is(&self, ttype: TokenType) -> bool {
        self.peek_token.is(ttype)
    }

    /// Advance iff the peek token has kind `ttype`; otherwise record an error.
    fn expect_peek(&mut self, ttype: TokenType) -> Option<()> {
        if self.peek_token_is(ttype) {
            self.next_token();

            return Some(());
        }

        self.push_error(format!(
            "expected next token to be {}, got {} instead",
            ttype, self.peek_token.token_type
        ));

        None
    }

    #[inline(always)]
    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek_token.token_type)
    }

    #[inline(always)]
    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur_token.token_type)
    }

    fn push_error(&mut self, message: String) {
        debug!("Parse error: {}", message);

        self.errors.push(message);
    }
}
