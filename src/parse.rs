use log::trace;
use pest::error::LineColLocation;
use pest::Parser;

use crate::calc::calculate;
use crate::errors::*;
use crate::format::format_tokens;
use crate::token::{Constant, Operator, Token};
use crate::value::Value;

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// holds the state of the engine between calculations: the last answer
#[derive(Clone, Debug, PartialEq)]
pub struct CalcState {
    answer: Value,
}

impl Default for CalcState {
    fn default() -> CalcState {
        CalcState {
            answer: Value::new(0.0, 0.0),
        }
    }
}

impl CalcState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the result of the last successful evaluation, zero before the first one
    pub fn answer(&self) -> Value {
        self.answer
    }

    pub fn set_answer(&mut self, v: Value) {
        self.answer = v;
    }
}

/// Splits display text into calculator keys. Whitespace is ignored, ASCII
/// spellings are accepted for every key (`*`, `/`, `-`, `pi`, `ans`).
///
/// Scientific notation produced by [`format`](crate::format::format) is read
/// back as keys: `1.5E-7` becomes `(1.5×10^(−7))`. `∞` and `NaN` have no keys
/// and are rejected
pub fn tokenize(expr: &str, state: &CalcState) -> Result<Vec<Token>, CalcError> {
    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        Err(e) => {
            let col = match e.line_col {
                LineColLocation::Pos((_, col)) => col,
                LineColLocation::Span((_, col), _) => col,
            };
            return Err(CalcError::Lex(format!("unknown symbol at position {}", col)));
        }
    };

    let mut tokens = Vec::new();
    for pair in pairs {
        let text = pair.as_str();
        match pair.as_rule() {
            Rule::EOI => {}
            Rule::answer => tokens.push(Token::Constant(Constant::Answer(state.answer))),
            Rule::scientific => tokens.extend(scientific(text)?),
            _ => tokens.push(key(text)?),
        }
    }
    trace!("tokens: {}", format_tokens(&tokens));
    Ok(tokens)
}

fn key(text: &str) -> Result<Token, CalcError> {
    Token::from_text(text).ok_or_else(|| CalcError::Lex(format!("unknown symbol '{}'", text)))
}

// mantissa×10^(exponent), bracketed so that a following `i` multiplies all of it
fn scientific(text: &str) -> Result<Vec<Token>, CalcError> {
    let (mantissa, exponent) = match text.split_once('E') {
        Some(parts) => parts,
        None => return Err(CalcError::Lex(format!("unknown symbol '{}'", text))),
    };

    let mut buf = [0u8; 4];
    let mut tokens = vec![Token::Open];
    for c in mantissa.chars() {
        tokens.push(key(c.encode_utf8(&mut buf))?);
    }
    tokens.extend_from_slice(&[
        Token::Operator(Operator::Times),
        Token::Digit(1),
        Token::Digit(0),
        Token::Operator(Operator::Power),
        Token::Open,
    ]);
    for c in exponent.chars() {
        match c {
            '+' => {}
            '-' | '−' => tokens.push(Token::Operator(Operator::Minus)),
            _ => tokens.push(key(c.encode_utf8(&mut buf))?),
        }
    }
    tokens.push(Token::Close);
    tokens.push(Token::Close);
    Ok(tokens)
}

/// evaluates a given expression and returns either result or error.
/// A successful result becomes the `Ans` of the next evaluation
pub fn eval(expr: &str, state: &mut CalcState) -> CalcResult {
    let tokens = tokenize(expr, state)?;
    let output = calculate(&tokens);
    if let Ok(v) = output {
        state.set_answer(v);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format;
    use crate::token::{Function, Operator};
    use float_cmp::approx_eq;

    #[test]
    fn test_tokenize() {
        let state = CalcState::new();
        let v = tokenize("12.5 + sin(pi)", &state);
        assert_eq!(
            v,
            Ok(vec![
                Token::Digit(1),
                Token::Digit(2),
                Token::Point,
                Token::Digit(5),
                Token::Operator(Operator::Plus),
                Token::Function(Function::Sin),
                Token::Open,
                Token::Constant(Constant::Pi),
                Token::Close,
            ])
        );
        let v = tokenize("asinh(e)mod 2", &state);
        assert_eq!(
            v,
            Ok(vec![
                Token::Function(Function::Asinh),
                Token::Open,
                Token::Constant(Constant::E),
                Token::Close,
                Token::Operator(Operator::Modulo),
                Token::Digit(2),
            ])
        );
        assert_eq!(tokenize("", &state), Ok(vec![]));
    }

    #[test]
    fn test_tokenize_errors() {
        let state = CalcState::new();
        assert_eq!(
            tokenize("2 $ 3", &state),
            Err(CalcError::Lex("unknown symbol at position 3".to_string()))
        );
        assert!(tokenize("sec(1)", &state).is_err());
        assert!(tokenize("∞", &state).is_err());
        assert!(tokenize("NaN", &state).is_err());
        assert!(tokenize("1E", &state).is_err());
    }

    #[test]
    fn test_scientific() {
        let state = CalcState::new();
        let v = tokenize("2.5E-7", &state).map(|t| format_tokens(&t));
        assert_eq!(v, Ok("(2.5×10^(−7))".to_string()));
        let v = tokenize("1E20i", &state).map(|t| format_tokens(&t));
        assert_eq!(v, Ok("(1×10^(20))i".to_string()));

        let mut state = CalcState::new();
        let v = eval("1E20", &mut state).unwrap();
        assert!(approx_eq!(f64, v.re, 1e20, ulps = 4));
        let v = eval("-1.5E-7+2E3i", &mut state).unwrap();
        assert!(approx_eq!(f64, v.re, -1.5e-7, epsilon = 1e-20));
        assert!(approx_eq!(f64, v.im, 2000.0, epsilon = 1e-9));
        // exponent sign is part of the number, not an operator
        let v = eval("1E+2-1", &mut state).unwrap();
        assert!(approx_eq!(f64, v.re, 99.0, epsilon = 1e-9));
    }

    #[test]
    fn test_expr() {
        let mut state = CalcState::new();
        let v = eval("2+3", &mut state);
        assert_eq!(v, Ok(Value::new(5.0, 0.0)));
        let v = eval("(3+2)(4-9)", &mut state);
        assert_eq!(v, Ok(Value::new(-25.0, 0.0)));
        let v = eval("(3+9)sin(1)", &mut state);
        assert_eq!(v, Ok(Value::new(12.0 * 1.0f64.sin(), 0.0)));
        let v = eval("1+2+3i", &mut state);
        assert_eq!(v, Ok(Value::new(3.0, 3.0)));
        let v = eval("3!!×2", &mut state);
        assert_eq!(v, Ok(Value::new(1440.0, 0.0)));
        let v = eval("√(-4)", &mut state);
        assert_eq!(v.map(format), Ok("2i".to_string()));
        let v = eval("3√8 + 2^10", &mut state);
        assert_eq!(v.map(format), Ok("1026".to_string()));
        let v = eval("log(1000) + lg(8)", &mut state);
        assert_eq!(v, Ok(Value::new(6.0, 0.0)));
        let v = eval("e^(πi)", &mut state);
        assert_eq!(v.map(format), Ok("-1".to_string()));
        let v = eval("0.5!", &mut state).unwrap();
        assert!(approx_eq!(f64, v.re, std::f64::consts::PI.sqrt() / 2.0, epsilon = 1e-12));
    }

    #[test]
    fn test_answer() {
        let mut state = CalcState::new();
        assert_eq!(eval("Ans", &mut state), Ok(Value::new(0.0, 0.0)));
        assert_eq!(eval("1+2", &mut state), Ok(Value::new(3.0, 0.0)));
        assert_eq!(state.answer(), Value::new(3.0, 0.0));
        assert_eq!(eval("Ans×2", &mut state), Ok(Value::new(6.0, 0.0)));
        assert_eq!(eval("2ans", &mut state), Ok(Value::new(12.0, 0.0)));

        // failures keep the previous answer
        assert!(eval("1÷", &mut state).is_err());
        assert_eq!(state.answer(), Value::new(12.0, 0.0));
    }

    #[test]
    fn test_errors() {
        let mut state = CalcState::new();
        assert_eq!(eval("", &mut state), Err(CalcError::TokensEmpty));
        assert_eq!(eval("   ", &mut state), Err(CalcError::TokensEmpty));
        assert_eq!(eval("2×-3", &mut state), Err(CalcError::Parse("2×".to_string())));
        assert_eq!(
            eval("0.1.0", &mut state),
            Err(CalcError::Runtime("Too many '.' in a number: 0.1.0".to_string()))
        );
        assert_eq!(
            eval("(3i)!", &mut state),
            Err(CalcError::Runtime("Factorial requires a real operand: (3i)!".to_string()))
        );
    }
}
