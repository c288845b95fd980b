use maru_ir::Position;
use pretty_assertions::assert_eq;

use crate::{Env, Evaluator, Value};

#[track_caller]
fn run(input: &str) -> Option<Value> {
    let (program, errors) = maru_parse::parse(input);
    assert!(
        errors.is_empty(),
        "syntax errors in {input:?}: {errors:#?}"
    );
    Evaluator::new().eval_program(&program, &Env::new())
}

#[track_caller]
fn eval_value(input: &str) -> Value {
    run(input).unwrap_or_else(|| panic!("no value produced for {input:?}"))
}

#[track_caller]
fn expect_int(value: &Value, expected: i64) {
    match value {
        Value::Int(actual) => assert_eq!(*actual, expected),
        other => panic!("expected INTEGER {expected}, got {other:?}"),
    }
}

#[track_caller]
fn expect_bool(value: &Value, expected: bool) {
    match value {
        Value::Bool(actual) => assert_eq!(*actual, expected),
        other => panic!("expected BOOLEAN {expected}, got {other:?}"),
    }
}

#[track_caller]
fn expect_str(value: &Value, expected: &str) {
    match value {
        Value::Str(actual) => assert_eq!(actual.as_ref(), expected),
        other => panic!("expected STRING {expected:?}, got {other:?}"),
    }
}

#[track_caller]
fn expect_error(value: &Value, message: &str, line: u32, column: u32) {
    match value {
        Value::Error(error) => {
            assert_eq!(error.message, message);
            assert_eq!(error.position, Position::new(line, column));
        }
        other => panic!("expected ERROR {message:?}, got {other:?}"),
    }
}

#[track_caller]
fn unwrap_maybe(value: Value) -> Value {
    match value {
        Value::Maybe(Some(inner)) => (*inner).clone(),
        other => panic!("expected a present optional, got {other:?}"),
    }
}

#[track_caller]
fn expect_absent(value: &Value) {
    assert!(
        matches!(value, Value::Maybe(None)),
        "expected the absent optional, got {value:?}"
    );
}

#[test]
fn integer_arithmetic() {
    let cases = [
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
    ];
    for (input, expected) in cases {
        expect_int(&eval_value(input), expected);
    }
}

#[test]
fn division_truncates_toward_zero() {
    expect_int(&eval_value("7 / 2"), 3);
    expect_int(&eval_value("-7 / 2"), -3);
}

#[test]
fn division_by_zero_is_an_error() {
    expect_error(&eval_value("5 / 0"), "division by zero", 1, 2);
}

#[test]
fn boolean_expressions() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 > 1", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true != false", true),
        ("(1 < 2) == true", true),
        ("(1 < 2) == false", false),
        ("(1 > 2) == true", false),
        ("1 < 2 == true", true),
    ];
    for (input, expected) in cases {
        expect_bool(&eval_value(input), expected);
    }
}

#[test]
fn bang_operator() {
    expect_bool(&eval_value("!true"), false);
    expect_bool(&eval_value("!false"), true);
    expect_bool(&eval_value("!!true"), true);
}

#[test]
fn bang_requires_a_boolean() {
    expect_error(&eval_value("!5"), "unknown operator: !INTEGER", 1, 1);
}

#[test]
fn string_literals_and_concatenation() {
    expect_str(&eval_value("\"hello world\""), "hello world");
    expect_str(
        &eval_value("\"Hello\" + \" \" + \"World!\""),
        "Hello World!",
    );
    expect_bool(&eval_value("\"a\" == \"a\""), true);
    expect_bool(&eval_value("\"a\" != \"b\""), true);
}

#[test]
fn string_repetition() {
    expect_str(&eval_value("\"hello\" * 3"), "hellohellohello");
    expect_str(&eval_value("\"ab\" * 0"), "");
    expect_str(&eval_value("\"ab\" * -2"), "");
}

#[test]
fn oversized_string_repetition_is_an_error() {
    expect_error(
        &eval_value("\"ab\" * 4611686018427387904"),
        "string repetition too large",
        1,
        6,
    );
    expect_str(&eval_value("\"\" * 4611686018427387904"), "");
}

#[test]
fn if_expressions_produce_optionals() {
    expect_int(&unwrap_maybe(eval_value("if true { 10 }")), 10);
    expect_absent(&eval_value("if false { 10 }"));
    expect_int(&unwrap_maybe(eval_value("if 1 < 2 { 10 }")), 10);
    expect_absent(&eval_value("if 1 > 2 { 10 }"));
    expect_int(&unwrap_maybe(eval_value("if 1 > 2 { 10 } else { 20 }")), 20);
    expect_int(&unwrap_maybe(eval_value("if 1 < 2 { 10 } else { 20 }")), 10);
}

#[test]
fn non_boolean_condition_selects_no_branch() {
    expect_absent(&eval_value("if 1 { 10 }"));
    expect_absent(&eval_value("if \"x\" { 10 } else { 20 }"));
}

#[test]
fn optionals_never_nest() {
    let value = eval_value("if true { if true { 10 } }");
    expect_int(&unwrap_maybe(value), 10);
}

#[test]
fn return_statements() {
    let cases = [
        ("return 10;", 10),
        ("return 10; 9;", 10),
        ("return 2 * 5; 9;", 10),
        ("9; return 2 * 5; 9;", 10),
        (
            "if 10 > 1 {\n  if 10 > 1 {\n    return 10;\n  }\n\n  return 1;\n}",
            10,
        ),
    ];
    for (input, expected) in cases {
        expect_int(&eval_value(input), expected);
    }
}

#[test]
fn bare_return_yields_the_absent_optional() {
    expect_absent(&eval_value("return;"));
    expect_absent(&eval_value("fn() { return; }()"));
}

#[test]
fn return_stops_at_the_enclosing_call() {
    expect_int(
        &eval_value("let f = fn(x) { return x; x + 10; }; f(10);"),
        10,
    );
    expect_int(
        &eval_value("let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);"),
        20,
    );
}

#[test]
fn let_statements() {
    let cases = [
        ("let a = 5; a;", 5),
        ("let a = 5 * 5; a;", 25),
        ("let a = 5; let b = a; b;", 5),
        ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
    ];
    for (input, expected) in cases {
        expect_int(&eval_value(input), expected);
    }
}

#[test]
fn let_statements_produce_no_value() {
    assert!(run("let a = 5;").is_none());
    assert!(run("").is_none());
}

#[test]
fn rebinding_shadows_in_place() {
    expect_int(&eval_value("let a = 5; let a = a + 1; a"), 6);
}

#[test]
fn function_values_render_their_source() {
    let value = eval_value("fn(x) { x + 2; };");
    match &value {
        Value::Function(function) => {
            assert_eq!(function.parameters.len(), 1);
            assert_eq!(value.inspect(), "fn(x) { (x + 2) }");
        }
        other => panic!("expected FUNCTION, got {other:?}"),
    }
}

#[test]
fn function_application() {
    let cases = [
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x; }(5)", 5),
    ];
    for (input, expected) in cases {
        expect_int(&eval_value(input), expected);
    }
}

#[test]
fn surplus_arguments_are_ignored() {
    expect_int(&eval_value("fn(x) { x }(1, 2, 3)"), 1);
}

#[test]
fn missing_arguments_are_an_error() {
    expect_error(
        &eval_value("\nlet test = fn(x, y, z){return x*y*z};\ntest(3)"),
        "missing parameters \"y, z\" in function call",
        3,
        1,
    );
    expect_error(
        &eval_value("\nlet test = fn(x, y, z){return x*y*z};\ntest(3, 4)"),
        "missing parameters \"z\" in function call",
        3,
        1,
    );
}

#[test]
fn empty_function_body_yields_the_absent_optional() {
    expect_absent(&eval_value("fn() {}()"));
    expect_absent(&eval_value("fn(x) { let y = x; }(1)"));
}

#[test]
fn closures_capture_their_environment() {
    expect_int(
        &eval_value("let newAdder = fn(x) { fn(y) { x + y }; }; let addTwo = newAdder(2); addTwo(3);"),
        5,
    );
}

#[test]
fn closures_see_rebindings_after_capture() {
    expect_int(&eval_value("let a = 5; let f = fn() { a }; let a = 6; f()"), 6);
}

#[test]
fn recursion_through_the_defining_scope() {
    let input = "\
let counter = fn(x) {
  if x > 100 {
    return true;
  } else {
    let foobar = 9999;
    counter(x + 1);
  }
};
counter(0);";
    expect_bool(&unwrap_maybe(eval_value(input)), true);
}

#[test]
fn error_messages_and_positions() {
    let cases = [
        (
            "5+true;",
            "type mismatch: INTEGER + BOOLEAN, expecting: INTEGER",
            (1, 3),
        ),
        (
            "5+true; 5;",
            "type mismatch: INTEGER + BOOLEAN, expecting: INTEGER",
            (1, 3),
        ),
        (
            "5 == true",
            "type mismatch: INTEGER == BOOLEAN, expecting: INTEGER",
            (1, 6),
        ),
        ("-true", "unknown operator: -BOOLEAN", (1, 1)),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN", (1, 6)),
        (
            "5; true + false; 5;",
            "unknown operator: BOOLEAN + BOOLEAN",
            (1, 9),
        ),
        (
            "if (10 > 1) { true + false; }",
            "unknown operator: BOOLEAN + BOOLEAN",
            (1, 20),
        ),
        (
            "\nif (10 > 1) {\n  if (10 > 1) {\n    return true + false;\n  }\n\n  return 1;\n}",
            "unknown operator: BOOLEAN + BOOLEAN",
            (4, 17),
        ),
        ("foobar", "identifier not found: foobar", (1, 1)),
        (
            "\"Hello\" - \"World\"",
            "unknown operator: STRING - STRING",
            (1, 9),
        ),
        ("5(1)", "not a function: INTEGER", (1, 1)),
    ];
    for (input, message, (line, column)) in cases {
        expect_error(&eval_value(input), message, line, column);
    }
}

#[test]
fn errors_short_circuit_the_rest_of_the_program() {
    expect_error(
        &eval_value("5 + true; 99"),
        "type mismatch: INTEGER + BOOLEAN, expecting: INTEGER",
        1,
        3,
    );
}

#[test]
fn error_inspect_format() {
    assert_eq!(
        eval_value("foobar").inspect(),
        "Error at position 1:1 - identifier not found: foobar"
    );
}

#[test]
fn array_literals() {
    let value = eval_value("[1, 2 * 2, 3 + 3]");
    assert_eq!(value.inspect(), "[1, 4, 6]");
}

#[test]
fn array_indexing_produces_optionals() {
    expect_int(&unwrap_maybe(eval_value("[1, 2, 3][0]")), 1);
    expect_int(&unwrap_maybe(eval_value("[1, 2, 3][1 + 1]")), 3);
    expect_int(&unwrap_maybe(eval_value("let i = 0; [1][i];")), 1);
    expect_int(&unwrap_maybe(eval_value("let myArray = [1, 2, 3]; myArray[2];")), 3);
    expect_int(
        &eval_value("let a = [1, 2, 3]; a[0].value + a[1].value + a[2].value;"),
        6,
    );
}

#[test]
fn out_of_bounds_indexing_is_absent() {
    expect_absent(&eval_value("[1, 2, 3][3]"));
    expect_absent(&eval_value("[1, 2, 3][-1]"));
    expect_absent(&eval_value("[\"hello\"][2]"));
}

#[test]
fn array_index_type_errors() {
    expect_error(
        &eval_value("[1][\"a\"]"),
        "cannot use STRING as index for array",
        1,
        5,
    );
    expect_error(&eval_value("5[0]"), "cannot use index of INTEGER", 1, 1);
}

#[test]
fn index_results_flatten_optional_elements() {
    let input = "let test = fn(){\"hello\"}; [[test()][fn(){if true {return 0}}()], \"test\", \"world\"][1-1]";
    expect_str(&unwrap_maybe(eval_value(input)), "hello");
}

#[test]
fn hash_literals_and_lookups() {
    let literal = "let two = \"two\";\nlet h = {\"one\": 10 - 9, two: 1 + 1, \"thr\" + \"ee\": 6 / 2, 4: 4, true: 5, false: 6};\n";
    let cases = [
        ("h[\"one\"]", 1),
        ("h[\"two\"]", 2),
        ("h[\"three\"]", 3),
        ("h[4]", 4),
        ("h[true]", 5),
        ("h[false]", 6),
    ];
    for (lookup, expected) in cases {
        let input = format!("{literal}{lookup}");
        expect_int(&unwrap_maybe(eval_value(&input)), expected);
    }
}

#[test]
fn missing_hash_keys_are_absent() {
    expect_absent(&eval_value("{\"foo\": 5}[\"bar\"]"));
    expect_absent(&eval_value("{}[\"foo\"]"));
}

#[test]
fn duplicate_hash_keys_keep_the_later_pair() {
    expect_int(&unwrap_maybe(eval_value("{\"a\": 1, \"a\": 2}[\"a\"]")), 2);
}

#[test]
fn unusable_hash_keys_are_errors() {
    expect_error(
        &eval_value("{[1]: 2}"),
        "cannot use type ARRAY as key for hash",
        1,
        7,
    );
    expect_error(
        &eval_value("{\"name\": \"Maru\"}[fn(x) { x }];"),
        "cannot use index of type FUNCTION for hash",
        1,
        18,
    );
}

#[test]
fn builtin_length() {
    expect_int(&eval_value("length(\"\")"), 0);
    expect_int(&eval_value("length(\"four\")"), 4);
    expect_int(&eval_value("length(\"hello world\")"), 11);
    expect_int(&eval_value("length([1, 2 * 2, 3 + 3])"), 3);
    expect_error(
        &eval_value("length(1)"),
        "argument to `length` not supported. got=INTEGER",
        1,
        1,
    );
    expect_error(
        &eval_value("length(\"one\", \"two\")"),
        "wrong number of arguments. got=2, want=1",
        1,
        1,
    );
}

#[test]
fn builtin_push_mutates_the_shared_array() {
    expect_int(&eval_value("let a = [1]; push(a, 2); length(a)"), 2);
    expect_int(&unwrap_maybe(eval_value("let a = []; push(a, 9); a[0]")), 9);
}

#[test]
fn builtin_first_and_last() {
    expect_int(&unwrap_maybe(eval_value("first([1, 2])")), 1);
    expect_int(&unwrap_maybe(eval_value("last([1, 2])")), 2);
    expect_absent(&eval_value("first([])"));
    expect_absent(&eval_value("last([])"));
}

#[test]
fn bindings_shadow_builtins() {
    expect_int(&eval_value("let length = fn(x) { 99 }; length([1])"), 99);
}

#[test]
fn optional_properties() {
    expect_bool(&eval_value("let m = if 1 < 2 { 10 }; m.hasValue"), true);
    expect_bool(&eval_value("let m = if 1 > 2 { 10 }; m.hasValue"), false);
    expect_int(&eval_value("let m = if 1 < 2 { 10 }; m.value"), 10);
}

#[test]
fn reading_an_absent_value_is_an_error() {
    expect_error(
        &eval_value("let m = if 1 > 2 { 10 }; m.value"),
        "\"m.value\" has no value! check before with \"hasValue\"!",
        1,
        26,
    );
}

#[test]
fn unknown_properties_are_errors() {
    expect_error(
        &eval_value("5.value"),
        "INTEGER has no property \"value\".",
        1,
        1,
    );
    expect_error(
        &eval_value("(if true { 1 }).hasFoo"),
        "MAYBE has no property \"hasFoo\".",
        1,
        2,
    );
}

#[test]
fn self_referential_arrays_render_without_overflow() {
    let rendered = eval_value("let a = [1]; push(a, a); a").inspect();
    assert!(rendered.starts_with("[1, [1,"));
    assert!(rendered.contains("..."));
}

#[test]
fn maybe_inspect_format() {
    assert_eq!(eval_value("if true { 10 }").inspect(), "maybe(10)");
    assert_eq!(eval_value("if false { 10 }").inspect(), "maybe([no value])");
}

#[test]
fn compound_equality_is_by_identity() {
    expect_bool(&eval_value("let a = [1]; let b = a; a == b"), true);
    expect_bool(&eval_value("[1] == [1]"), false);
    expect_bool(&eval_value("let f = fn(x) { x }; f == f"), true);
    expect_bool(&eval_value("length == length"), true);
}

#[test]
fn optional_equality_is_structural() {
    expect_bool(&eval_value("(if true { 1 }) == (if true { 1 })"), true);
    expect_bool(&eval_value("(if false { 1 }) == (if false { 1 })"), true);
    expect_bool(&eval_value("(if true { 1 }) == (if false { 1 })"), false);
    expect_bool(&eval_value("(if true { 1 }) != (if true { 2 })"), true);
}

#[test]
fn rendered_programs_evaluate_identically() {
    let inputs = [
        "2 * (5 + 10)",
        "(5 + 10 * 2 + 15 / 3) * 2 + -10",
        "1 < 2 == true",
        "!true",
        "[1, 2 + 3][1]",
        "if 1 < 2 { 10 } else { 20 }",
        "let f = fn(x, y) { x + y }; f(2, 3)",
    ];
    for input in inputs {
        let (program, errors) = maru_parse::parse(input);
        assert!(errors.is_empty(), "{input}: {errors:#?}");
        let rendered = program.to_string();
        let original = eval_value(input);
        let reparsed = eval_value(&rendered);
        assert_eq!(original.inspect(), reparsed.inspect(), "{input} vs {rendered}");
    }
}
