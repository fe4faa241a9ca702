//! Tree‑walking evaluator.
//!
//! Every node evaluates to an [`Object`]. Failures are `Object::Error` values
//! and early exits are `Object::ReturnValue` values; both stop a statement
//! sequence and are handed straight back by operand and argument evaluation,
//! so no separate unwinding mechanism is needed.
//!
//! Integer arithmetic is checked: overflow and division by zero produce
//! error objects instead of wrapping or panicking.

use std::rc::Rc;

use log::{debug, info, trace};

use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::environment::{self, Env, Environment};
use crate::object::{Function, Object, NULL};
use crate::stack::ensure_sufficient_stack;

/// Evaluate `program` against `env`, which keeps any bindings it makes.
pub fn eval(program: &Program, env: &Env) -> Object {
    Interpreter::with_environment(env.clone()).eval_program(program)
}

fn new_error(message: String) -> Object {
    debug!("Evaluation error: {}", message);

    Object::Error(message)
}

/// Walks the AST while tracking the scope currently in effect.
pub struct Interpreter {
    environment: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter with an empty top‑level scope.
    pub fn new() -> Self {
        info!("Initializing Interpreter");

        Self::with_environment(Environment::new_shared())
    }

    /// Creates an interpreter evaluating in an existing scope, e.g. the
    /// session scope of a REPL.
    pub fn with_environment(environment: Env) -> Self {
        Self { environment }
    }

    /// Evaluates a whole program. A top‑level `return` is unwrapped here.
    pub fn eval_program(&mut self, program: &Program) -> Object {
        debug!("Evaluating {} statement(s)", program.statements.len());

        let mut result: Object = NULL;

        for stmt in &program.statements {
            result = self.eval_statement(stmt);

            if let Object::ReturnValue(value) = result {
                return *value;
            }

            if result.is_error() {
                return result;
            }
        }

        info!("Program evaluated to: {}", result);

        result
    }

    /// Evaluates a block. A `return` stays wrapped so that it keeps
    /// unwinding through enclosing blocks up to the call or program.
    fn eval_block(&mut self, block: &BlockStatement) -> Object {
        let mut result: Object = NULL;

        for stmt in &block.statements {
            result = self.eval_statement(stmt);

            if result.is_signal() {
                return result;
            }
        }

        result
    }

    fn eval_statement(&mut self, stmt: &Statement) -> Object {
        match stmt {
            Statement::Let { name, value, .. } => {
                let value = self.eval_expression(value);

                if value.is_signal() {
                    return value;
                }

                debug!("Binding '{}' to {}", name.value, value);

                self.environment.borrow_mut().set(&name.value, value);

                NULL
            }

            Statement::Return { value, .. } => {
                let value = self.eval_expression(value);

                if value.is_signal() {
                    return value;
                }

                Object::ReturnValue(Box::new(value))
            }

            Statement::Expression { expression, .. } => self.eval_expression(expression),

            Statement::Block(block) => self.eval_block(block),
        }
    }

    /// Evaluates an expression in the current scope.
    pub fn eval_expression(&mut self, expr: &Expression) -> Object {
        ensure_sufficient_stack(|| self.eval_expression_inner(expr))
    }

    fn eval_expression_inner(&mut self, expr: &Expression) -> Object {
        trace!("Evaluating expression: {}", expr);

        match expr {
            Expression::IntegerLiteral { value, .. } => Object::Integer(*value),

            Expression::Boolean { value, .. } => Object::from_bool(*value),

            Expression::Identifier(ident) => self.eval_identifier(ident),

            Expression::Prefix {
                operator, right, ..
            } => {
                let right = self.eval_expression(right);

                if right.is_signal() {
                    return right;
                }

                eval_prefix_expression(operator, right)
            }

            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.eval_expression(left);

                if left.is_signal() {
                    return left;
                }

                let right = self.eval_expression(right);

                if right.is_signal() {
                    return right;
                }

                eval_infix_expression(operator, left, right)
            }

            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let condition = self.eval_expression(condition);

                if condition.is_signal() {
                    return condition;
                }

                if condition.is_truthy() {
                    self.eval_block(consequence)
                } else if let Some(alt) = alternative {
                    self.eval_block(alt)
                } else {
                    NULL
                }
            }

            Expression::Function {
                parameters, body, ..
            } => Object::Function(Rc::new(Function {
                parameters: Rc::clone(parameters),
                body: Rc::clone(body),
                env: Rc::clone(&self.environment),
            })),

            Expression::Call {
                function,
                arguments,
                ..
            } => {
                let callee = self.eval_expression(function);

                if callee.is_signal() {
                    return callee;
                }

                let mut args: Vec<Object> = Vec::with_capacity(arguments.len());

                for arg in arguments {
                    let value = self.eval_expression(arg);

                    if value.is_signal() {
                        return value;
                    }

                    args.push(value);
                }

                self.apply_function(callee, args)
            }
        }
    }

    fn eval_identifier(&self, ident: &Identifier) -> Object {
        match self.environment.borrow().get(&ident.value) {
            Some(value) => value,
            None => new_error(format!("identifier not found: {}", ident.value)),
        }
    }

    /// Runs a closure body in a fresh scope enclosed by the closure's
    /// captured scope (not the caller's).
    fn apply_function(&mut self, callee: Object, args: Vec<Object>) -> Object {
        ensure_sufficient_stack(|| self.apply_function_inner(callee, args))
    }

    fn apply_function_inner(&mut self, callee: Object, args: Vec<Object>) -> Object {
        let func = match callee {
            Object::Function(func) => func,
            other => return new_error(format!("not a function: {}", other.type_name())),
        };

        if args.len() != func.parameters.len() {
            return new_error(format!(
                "wrong number of arguments: want={}, got={}",
                func.parameters.len(),
                args.len()
            ));
        }

        debug!("Calling {}", func);

        let mut scope = Environment::new_enclosed(Rc::clone(&func.env));

        for (param, arg) in func.parameters.iter().zip(args) {
            trace!("Binding parameter '{}' to {}", param.value, arg);

            scope.set(&param.value, arg);
        }

        let scope: Env = scope.into_shared();
        let saved_env: Env = std::mem::replace(&mut self.environment, Rc::clone(&scope));
        let result = self.eval_block(&func.body);
        self.environment = saved_env;

        let result = match result {
            Object::ReturnValue(value) => *value,
            other => other,
        };

        // A function bound in the call scope captures that scope, so the two
        // keep each other alive. Only the result can carry anything out of
        // the call; when it cannot reach the scope, unbind everything.
        if !scope.borrow().is_empty() && !environment::reaches(&result, &scope) {
            trace!("Releasing call scope of {}", func);

            scope.borrow_mut().clear();
        }

        result
    }
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => Object::from_bool(!right.is_truthy()),

        "-" => match right {
            Object::Integer(n) => match n.checked_neg() {
                Some(v) => Object::Integer(v),
                None => new_error(format!("integer overflow: -({})", n)),
            },
            other => new_error(format!("unknown operator: -{}", other.type_name())),
        },

        _ => new_error(format!("unknown operator: {}{}", operator, right.type_name())),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),

        (Object::Boolean(l), Object::Boolean(r)) => match operator {
            "==" => Object::from_bool(l == r),
            "!=" => Object::from_bool(l != r),
            _ => unknown_infix(operator, &left, &right),
        },

        (Object::Null, Object::Null) => match operator {
            "==" => Object::from_bool(true),
            "!=" => Object::from_bool(false),
            _ => unknown_infix(operator, &left, &right),
        },

        _ if left.type_name() != right.type_name() => new_error(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),

        _ => unknown_infix(operator, &left, &right),
    }
}

fn eval_integer_infix(operator: &str, l: i64, r: i64) -> Object {
    let checked = match operator {
        "+" => l.checked_add(r),
        "-" => l.checked_sub(r),
        "*" => l.checked_mul(r),
        "/" => {
            if r == 0 {
                return new_error(format!("division by zero: {} / 0", l));
            }

            l.checked_div(r)
        }
        "<" => return Object::from_bool(l < r),
        ">" => return Object::from_bool(l > r),
        "==" => return Object::from_bool(l == r),
        "!=" => return Object::from_bool(l != r),
        _ => {
            return new_error(format!("unknown operator: INTEGER {} INTEGER", operator));
        }
    };

    match checked {
        Some(v) => Object::Integer(v),
        None => new_error(format!("integer overflow: {} {} {}", l, operator, r)),
    }
}

fn unknown_infix(operator: &str, left: &Object, right: &Object) -> Object {
    new_error(format!(
        "unknown operator: {} {} {}",
        left.type_name(),
        operator,
        right.type_name()
    ))
}
