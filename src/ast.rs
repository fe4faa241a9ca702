//! **Abstract syntax tree** produced by the parser.
//!
//! Nodes are inert data. They know their originating token's literal and how
//! to render themselves as text (used by diagnostics and tests); walking the
//! tree is the evaluator's job.
//!
//! Rendering fully parenthesises operator expressions so that precedence is
//! visible: `-a * b` renders as `((-a) * b)`.

use serde::Serialize;
use std::fmt;
use std::rc::Rc;

use crate::token::Token;

/// Root node: the ordered statements of one parsed source text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    /// Literal of the first statement's token, or empty for an empty program.
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |stmt| stmt.token_literal())
    }
}

/// A name occurring in source, either bound (`let`, parameters) or read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let value = token.literal.clone();

        Self { token, value }
    }

    pub fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

/// Braced sequence of statements: `{ ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatement {
    /// The opening `{`.
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl BlockStatement {
    pub fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

/// Constructs that produce no value of their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// `let <name> = <value>;`
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },

    /// `return <value>;`
    Return { token: Token, value: Expression },

    /// An expression used in statement position.
    Expression { token: Token, expression: Expression },

    /// A bare `{ ... }` in statement position.
    Block(BlockStatement),
}

impl Statement {
    pub fn token_literal(&self) -> &str {
        match self {
            Statement::Let { token, .. }
            | Statement::Return { token, .. }
            | Statement::Expression { token, .. } => &token.literal,
            Statement::Block(block) => block.token_literal(),
        }
    }
}

/// Constructs that evaluate to a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Identifier(Identifier),

    IntegerLiteral {
        token: Token,
        value: i64,
    },

    Boolean {
        token: Token,
        value: bool,
    },

    /// Unary operator: `!x`, `-x`.
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },

    /// Binary operator: `a + b`, `a == b`, ...
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },

    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },

    /// `fn(<params>) { <body> }`
    ///
    /// Parameters and body sit behind `Rc` so that every closure created from
    /// this literal shares them instead of copying the subtree.
    Function {
        token: Token,
        parameters: Rc<[Identifier]>,
        body: Rc<BlockStatement>,
    },

    /// `<function>(<arguments>)`; the token is the `(`.
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    pub fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(ident) => ident.token_literal(),
            Expression::IntegerLiteral { token, .. }
            | Expression::Boolean { token, .. }
            | Expression::Prefix { token, .. }
            | Expression::Infix { token, .. }
            | Expression::If { token, .. }
            | Expression::Function { token, .. }
            | Expression::Call { token, .. } => &token.literal,
        }
    }
}

// ───────────────────────────── rendering ─────────────────────────────

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }

        write!(f, "{}", item)?;
    }

    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }

        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Renders the inner statements only; callers add the braces.
impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }

        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { token, name, value } => {
                write!(f, "{} {} = {};", token.literal, name, value)
            }

            Statement::Return { token, value } => write!(f, "{} {};", token.literal, value),

            Statement::Expression { expression, .. } => write!(f, "{}", expression),

            Statement::Block(block) => write!(f, "{{ {} }}", block),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),

            Expression::IntegerLiteral { token, .. } | Expression::Boolean { token, .. } => {
                f.write_str(&token.literal)
            }

            Expression::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),

            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),

            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {} {{ {} }}", condition, consequence)?;

                if let Some(alt) = alternative {
                    write!(f, " else {{ {} }}", alt)?;
                }

                Ok(())
            }

            Expression::Function {
                token,
                parameters,
                body,
            } => {
                write!(f, "{}(", token.literal)?;
                write_joined(f, parameters)?;
                write!(f, ") {{ {} }}", body)
            }

            Expression::Call {
                function,
                arguments,
                ..
            } => {
                write!(f, "{}(", function)?;
                write_joined(f, arguments)?;
                f.write_str(")")
            }
        }
    }
}
