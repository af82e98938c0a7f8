use float_cmp::approx_eq;
use rclc_tokens::{calculate, describe, eval, format, tokenize, CalcError, CalcState, Value};

fn assert_same(expr: &str, lhs: Value, rhs: Value) {
    assert!(
        approx_eq!(f64, lhs.re, rhs.re, epsilon = 1e-9, ulps = 8)
            && approx_eq!(f64, lhs.im, rhs.im, epsilon = 1e-9, ulps = 8),
        "{}: {} != {}",
        expr,
        lhs,
        rhs
    );
}

// evaluates an expression, then evaluates the text of its syntax tree again
fn check_description(expr: &str) {
    let state = CalcState::new();
    let tokens = tokenize(expr, &state).unwrap();
    let value = calculate(&tokens).unwrap();
    let text = describe(&tokens).unwrap();

    let again = tokenize(&text, &state).unwrap_or_else(|e| panic!("{} -> {}: {}", expr, text, e));
    let reparsed = calculate(&again).unwrap_or_else(|e| panic!("{} -> {}: {}", expr, text, e));
    assert_same(expr, value, reparsed);
}

#[test]
fn description_evaluates_to_same_value() {
    let exprs = [
        "6+7",
        "1+2×3^4",
        "8−3−2",
        "8÷4×2",
        "2^3^2",
        "9÷3!",
        "3!!×2",
        "−2^2",
        "+5−1",
        "√9",
        "3√8",
        "3√(−8)",
        "2π",
        "(1+2)(3+4)",
        "(3+9)sin(1)",
        "sin(0.5)cos(0.5)",
        "12.5 mod 4",
        "e^(πi)",
        "ln(−1)",
        "1+i",
        "2+2i",
        "−2−2i",
        "log(1000)+lg(8)",
        "0.5!",
        "asinh(1)tan(0.3)",
        "((1))",
        "2(3)(4)",
    ];
    for expr in exprs.iter() {
        check_description(expr);
    }
}

#[test]
fn description_keeps_the_answer() {
    let mut state = CalcState::new();
    eval("6×7", &mut state).unwrap();

    let tokens = tokenize("2Ans+1", &state).unwrap();
    let text = describe(&tokens).unwrap();
    let again = tokenize(&text, &state).unwrap();
    assert_eq!(calculate(&again), Ok(Value::new(85.0, 0.0)));
}

#[test]
fn empty_input() {
    let state = CalcState::new();
    let tokens = tokenize("", &state).unwrap();
    assert_eq!(calculate(&tokens), Err(CalcError::TokensEmpty));
    assert_eq!(describe(&tokens), Err(CalcError::TokensEmpty));
}

#[test]
fn formatted_values() {
    let cases = [
        (Value::new(0.0, 0.0), "0"),
        (Value::new(1.0, 0.0), "1"),
        (Value::new(0.0, 1.0), "i"),
        (Value::new(1.0, 1.0), "1+i"),
        (Value::new(2.0, 2.0), "2+2i"),
        (Value::new(-2.0, -2.0), "-2-2i"),
        (Value::new(1e20, 0.0), "1E20"),
        (Value::new(0.0, 1e20), "1E20i"),
    ];
    for (value, text) in cases.iter() {
        assert_eq!(format(*value), *text);
    }
}

#[test]
fn special_values_are_not_read_back() {
    let mut state = CalcState::new();
    for value in [Value::new(f64::INFINITY, 0.0), Value::new(f64::NAN, 0.0)].iter() {
        match eval(&format(*value), &mut state) {
            Err(CalcError::Lex(_)) => {}
            other => panic!("{}: {:?}", format(*value), other),
        }
    }
}

#[test]
fn formatted_values_read_back() {
    let values = [
        Value::new(0.0, 0.0),
        Value::new(1.0, 0.0),
        Value::new(0.0, 1.0),
        Value::new(1.0, 1.0),
        Value::new(2.0, 2.0),
        Value::new(-2.0, -2.0),
        Value::new(0.25, -3.5),
        Value::new(-0.125, 0.0),
        Value::new(1e20, 0.0),
        Value::new(0.0, 1e20),
        Value::new(-1.5e-7, 0.0),
        Value::new(2.5e-12, -3e15),
        Value::new(123_456_789_000.0, 1.0),
    ];
    for value in values.iter() {
        let text = format(*value);
        let mut state = CalcState::new();
        let back = eval(&text, &mut state).unwrap_or_else(|e| panic!("{}: {}", text, e));
        assert_same(&text, *value, back);
    }
}
