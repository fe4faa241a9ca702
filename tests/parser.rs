#[cfg(test)]
mod parser_tests {
    use monkey_interp as monkey;

    use monkey::ast::*;
    use monkey::lexer::Lexer;
    use monkey::parser::{parse, Parser};
    use pretty_assertions::assert_eq;

    /// Parse and fail the test on any parse error.
    fn parse_ok(source: &str) -> Program {
        let (program, errors) = parse(source);

        assert!(
            errors.is_empty(),
            "parser had {} error(s) for {:?}: {:?}",
            errors.len(),
            source,
            errors
        );

        program
    }

    fn single_expression(source: &str) -> Expression {
        let program = parse_ok(source);

        assert_eq!(program.statements.len(), 1, "program: {}", program);

        match program.statements.into_iter().next() {
            Some(Statement::Expression { expression, .. }) => expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_let_statement() {
        let program = parse_ok("let x = 5;");

        assert_eq!(program.statements.len(), 1);

        match &program.statements[0] {
            Statement::Let { token, name, value } => {
                assert_eq!(token.literal, "let");
                assert_eq!(name.value, "x");
                assert_eq!(name.token_literal(), "x");
                assert!(matches!(value, Expression::IntegerLiteral { value: 5, .. }));
            }
            other => panic!("expected let statement, got {:?}", other),
        }
    }

    #[test]
    fn test_let_statements_render() {
        let cases = [
            ("let x = 5;", "let x = 5;"),
            ("let y = true;", "let y = true;"),
            ("let foobar = y", "let foobar = y;"),
        ];

        for (input, expected) in cases {
            assert_eq!(parse_ok(input).to_string(), expected);
        }
    }

    #[test]
    fn test_return_statements() {
        let program = parse_ok("return 5; return 10; return add(15);");

        assert_eq!(program.statements.len(), 3);

        for stmt in &program.statements {
            assert!(matches!(stmt, Statement::Return { .. }));
            assert_eq!(stmt.token_literal(), "return");
        }

        assert_eq!(program.to_string(), "return 5;return 10;return add(15);");
    }

    #[test]
    fn test_identifier_and_literals() {
        assert!(matches!(
            single_expression("foobar;"),
            Expression::Identifier(Identifier { ref value, .. }) if value == "foobar"
        ));
        assert!(matches!(
            single_expression("5;"),
            Expression::IntegerLiteral { value: 5, .. }
        ));
        assert!(matches!(
            single_expression("false"),
            Expression::Boolean { value: false, .. }
        ));
    }

    #[test]
    fn test_prefix_expressions() {
        for (input, operator, operand) in [("!5;", "!", "5"), ("-15;", "-", "15"), ("!true", "!", "true")] {
            match single_expression(input) {
                Expression::Prefix {
                    operator: op,
                    right,
                    ..
                } => {
                    assert_eq!(op, operator);
                    assert_eq!(right.to_string(), operand);
                }
                other => panic!("expected prefix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_infix_expressions() {
        for operator in ["+", "-", "*", "/", ">", "<", "==", "!="] {
            let source = format!("5 {} 6;", operator);

            match single_expression(&source) {
                Expression::Infix {
                    left,
                    operator: op,
                    right,
                    ..
                } => {
                    assert_eq!(op, operator);
                    assert_eq!(left.to_string(), "5");
                    assert_eq!(right.to_string(), "6");
                }
                other => panic!("expected infix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c", "(a + (b * c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
            ("f(x)(y)", "f(x)(y)"),
        ];

        for (input, expected) in cases {
            assert_eq!(parse_ok(input).to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_if_expression() {
        match single_expression("if (x < y) { x }") {
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                assert_eq!(condition.to_string(), "(x < y)");
                assert_eq!(consequence.statements.len(), 1);
                assert_eq!(consequence.to_string(), "x");
                assert!(alternative.is_none());
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_expression() {
        let expr = single_expression("if (x < y) { x } else { y }");

        assert_eq!(expr.to_string(), "if (x < y) { x } else { y }");

        match expr {
            Expression::If { alternative, .. } => {
                let alt = alternative.expect("else block");
                assert_eq!(alt.to_string(), "y");
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_function_literal() {
        match single_expression("fn(x, y) { x + y; }") {
            Expression::Function {
                parameters, body, ..
            } => {
                let names: Vec<&str> = parameters.iter().map(|p| p.value.as_str()).collect();
                assert_eq!(names, ["x", "y"]);
                assert_eq!(body.statements.len(), 1);
                assert_eq!(body.to_string(), "(x + y)");
            }
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn test_function_parameter_counts() {
        for (input, expected) in [
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ] {
            match single_expression(input) {
                Expression::Function { parameters, .. } => {
                    let names: Vec<&str> = parameters.iter().map(|p| p.value.as_str()).collect();
                    assert_eq!(names, expected);
                }
                other => panic!("expected function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        match single_expression("add(1, 2 * 3, 4 + 5);") {
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                assert_eq!(function.to_string(), "add");
                let rendered: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                assert_eq!(rendered, ["1", "(2 * 3)", "(4 + 5)"]);
            }
            other => panic!("expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_block_statement() {
        let program = parse_ok("{ let a = 1; a }");

        assert!(matches!(&program.statements[0], Statement::Block(b) if b.statements.len() == 2));
        assert_eq!(program.to_string(), "{ let a = 1;a }");
    }

    #[test]
    fn test_token_literals() {
        let program = parse_ok("let x = fn(a) { a }; x(1)");

        assert_eq!(program.token_literal(), "let");
        assert_eq!(program.statements[1].token_literal(), "x");
        assert_eq!(Program::default().token_literal(), "");
    }

    #[test]
    fn test_deeply_nested_groups() {
        let depth = 10_000;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(parse_ok(&source).to_string(), "1");
    }

    #[test]
    fn test_program_serializes_to_json() {
        let program = parse_ok("let add = fn(x, y) { x + y }; add(1, 2)");

        let json = serde_json::to_string(&program).expect("AST serializes");
        let tree: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

        let function = &tree["statements"][0]["Let"]["value"]["Function"];
        assert_eq!(function["parameters"][0]["value"], "x");
        assert_eq!(function["parameters"][1]["value"], "y");
        assert_eq!(function["body"]["statements"][0]["Expression"]["token"]["literal"], "x");
        assert_eq!(tree["statements"][1]["Expression"]["token"]["token_type"], "IDENT");
    }

    // ───────────────────────── error reporting ─────────────────────────

    #[test]
    fn test_let_errors() {
        let (_, errors) = parse("let x 5; let = 10; let 838383;");

        assert_eq!(
            errors,
            [
                "expected next token to be ASSIGN, got INT instead",
                "expected next token to be IDENT, got ASSIGN instead",
                "no prefix parse function for ASSIGN found",
                "expected next token to be IDENT, got INT instead",
            ]
        );
    }

    #[test]
    fn test_missing_prefix_function() {
        let (_, errors) = parse("+5");

        assert_eq!(errors, ["no prefix parse function for PLUS found"]);
    }

    #[test]
    fn test_illegal_token_reported() {
        let (_, errors) = parse("let a = $;");

        // The dangling ';' then starts a statement of its own.
        assert_eq!(
            errors,
            [
                "no prefix parse function for ILLEGAL found",
                "no prefix parse function for SEMICOLON found",
            ]
        );
    }

    #[test]
    fn test_unclosed_group() {
        let (_, errors) = parse("(1 + 2");

        assert_eq!(errors, ["expected next token to be RPAREN, got EOF instead"]);
    }

    #[test]
    fn test_integer_out_of_range() {
        let (_, errors) = parse("99999999999999999999");

        assert_eq!(errors, ["could not parse \"99999999999999999999\" as integer"]);
    }

    #[test]
    fn test_bad_parameter_list() {
        let (_, errors) = parse("fn(1) { 1 }");

        assert_eq!(errors[0], "expected next token to be IDENT, got INT instead");
    }

    #[test]
    fn test_parsing_continues_after_error() {
        let mut parser = Parser::new(Lexer::new("let = 1; let ok = 2;"));
        let program = parser.parse_program();

        assert!(!parser.errors().is_empty());
        assert!(program
            .statements
            .iter()
            .any(|s| s.to_string() == "let ok = 2;"));
    }
}
