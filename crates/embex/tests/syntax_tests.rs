use embex::ast::{BinaryOp, ExprKind, Literal, UnaryOp};
use embex::context::DEFAULT_MAX_DEPTH;
use embex::lexer::{tokenize, TokenKind};
use embex::*;
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════
// Lexer
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_tokenize_literals() {
    let kinds: Vec<TokenKind> = tokenize(r#"42 0x2a 1.5 2e3 "a\n" 'b' true nil"#)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Int(42),
            TokenKind::Int(42),
            TokenKind::Float(1.5),
            TokenKind::Float(2000.0),
            TokenKind::Str("a\n".to_string()),
            TokenKind::Str("b".to_string()),
            TokenKind::Bool(true),
            TokenKind::Nil,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_tokenize_keyword_prefix_is_ident() {
    let tokens = tokenize("x in inner").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::In);
    assert_eq!(tokens[2].kind, TokenKind::Ident);
    assert_eq!(tokens[2].lexeme, "inner");
}

#[test]
fn test_tokenize_empty() {
    let tokens = tokenize("   ").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].offset, 3);
}

// ═══════════════════════════════════════════════════════════════════════
// Parser
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_binary_tree_shape() {
    let expr = parse("1 + 2 * 3").unwrap();
    match expr.kind {
        ExprKind::Binary {
            op: BinaryOp::Add,
            left,
            right,
        } => {
            assert_eq!(left.kind, ExprKind::Literal(Literal::Int(1)));
            assert!(matches!(
                right.kind,
                ExprKind::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            ));
            assert_eq!(right.offset, 6);
        }
        other => panic!("expected addition, got {:?}", other),
    }
}

#[test]
fn test_parse_unary_binds_tighter_than_binary() {
    let expr = parse("-a * b").unwrap();
    match expr.kind {
        ExprKind::Binary {
            op: BinaryOp::Mul,
            left,
            ..
        } => assert!(matches!(
            left.kind,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                ..
            }
        )),
        other => panic!("expected multiplication, got {:?}", other),
    }
}

#[test]
fn test_parse_call_and_collections() {
    let expr = parse("f(x, [1, 2], {k: 'v'})").unwrap();
    match expr.kind {
        ExprKind::Call { name, args } => {
            assert_eq!(name, "f");
            assert_eq!(args.len(), 3);
            assert!(matches!(args[1].kind, ExprKind::List(ref items) if items.len() == 2));
            assert!(matches!(args[2].kind, ExprKind::Map(ref entries) if entries[0].0 == "k"));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn test_parse_is_reusable_across_bindings() {
    let evaluator = Evaluator::new();
    let expr = evaluator.parse("n in allowed").unwrap();
    let functions = Functions::new();

    let mut vars = Variables::new();
    vars.insert(
        "allowed".to_string(),
        Value::list(vec![Value::Int(1), Value::Int(2)]),
    );

    vars.insert("n".to_string(), Value::Int(2));
    assert_eq!(
        evaluator.eval_ast(&expr, &vars, &functions).unwrap(),
        Value::Bool(true)
    );

    vars.insert("n".to_string(), Value::Int(5));
    assert_eq!(
        evaluator.eval_ast(&expr, &vars, &functions).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn test_parse_limits() {
    let deep = format!("{}1{}", "(".repeat(300), ")".repeat(300));
    assert!(matches!(
        parse(&deep),
        Err(Error::Parse(ParseError::TooDeeplyNested { limit: 256, .. }))
    ));

    let wide = vec!["1"; 6000].join(" + ");
    assert!(matches!(
        parse(&wide),
        Err(Error::Parse(ParseError::TooManyNodes { limit: 10_000, .. }))
            | Err(Error::Parse(ParseError::TooDeeplyNested { .. }))
    ));

    let evaluator = Evaluator::with_context(
        EvalContext::new()
            .with_max_depth(100_000)
            .with_max_nodes(100_000),
    );
    assert_eq!(
        evaluator
            .evaluate(&vec!["1"; 500].join(" + "), &Variables::new(), &Functions::new())
            .unwrap(),
        Value::Int(500)
    );
}

fn nested(open: &str, inner: &str, close: &str, levels: usize) -> String {
    format!("{}{}{}", open.repeat(levels), inner, close.repeat(levels))
}

#[test]
fn test_default_depth_fits_small_thread_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(|| {
            let limit = DEFAULT_MAX_DEPTH;
            let mut vars = Variables::new();
            vars.insert("a".to_string(), Value::list(vec![Value::Int(0)]));
            let mut functions = Functions::new();
            functions.insert("f".to_string(), function(|args| Ok(args[0].clone())));

            // (construct, exactly at the limit, one level past it)
            let cases = [
                (
                    "parens",
                    nested("(", "1", ")", limit - 1),
                    nested("(", "1", ")", limit),
                ),
                (
                    "unary",
                    format!("{}1", "-".repeat(limit - 1)),
                    format!("{}1", "-".repeat(limit)),
                ),
                (
                    "index",
                    format!("-{}", nested("a[", "0", "]", (limit - 2) / 2)),
                    nested("a[", "0", "]", limit / 2),
                ),
                (
                    "list",
                    nested("[", "1", "]", limit - 1),
                    nested("[", "1", "]", limit),
                ),
                (
                    "call",
                    nested("f(", "1", ")", limit - 1),
                    nested("f(", "1", ")", limit),
                ),
                (
                    "ternary",
                    nested("true ? ", "1", " : 0", limit - 1),
                    nested("true ? ", "1", " : 0", limit),
                ),
            ];

            for (construct, at_limit, past_limit) in cases {
                let result = evaluate(&at_limit, &vars, &functions);
                assert!(result.is_ok(), "{} at the limit: {:?}", construct, result);

                let result = evaluate(&past_limit, &vars, &functions);
                assert!(
                    matches!(
                        result,
                        Err(Error::Parse(ParseError::TooDeeplyNested { limit: l, .. })) if l == limit
                    ),
                    "{} past the limit: {:?}",
                    construct,
                    result
                );
            }
        })
        .unwrap();

    handle.join().unwrap();
}
