use log::{debug, trace};

use crate::ast::Node;
use crate::combinator::{ErrorKind, ParseError};
use crate::errors::*;
use crate::format::{format, format_tokens};
use crate::grammar::{expression, reversed, Tokens, MAX_NESTING};
use crate::token::{Precedence, Token};

// how many tokens around the failure point a parse error shows
const ERROR_CONTEXT: usize = 3;

/// Parses a token sequence into its syntax tree
pub fn parse(tokens: &[Token]) -> Result<Node, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::TokensEmpty);
    }
    expression(Precedence::Low)
        .parse_all(reversed(tokens))
        .map_err(|e| parse_error(tokens, e))
}

/// Evaluates a token sequence in typing order
pub fn calculate(tokens: &[Token]) -> CalcResult {
    debug!("calculating {}", format_tokens(tokens));
    let node = parse(tokens)?;
    trace!("parsed as {}", node);
    let value = node.eval()?;
    debug!("result {}", format(value));
    Ok(value)
}

/// Fully bracketed description of how the tokens were understood,
/// e.g. `((1)+((2)×(3)))`
pub fn describe(tokens: &[Token]) -> Result<String, CalcError> {
    parse(tokens).map(|node| node.to_string())
}

// The remainder of a reversed stream is the beginning of the expression; its
// front is where parsing stopped
fn parse_error(tokens: &[Token], e: ParseError<Tokens>) -> CalcError {
    let rest = e.rest.as_slice();
    let near: Vec<Token> = if rest.is_empty() {
        tokens.iter().take(ERROR_CONTEXT).copied().collect()
    } else {
        rest.iter().take(ERROR_CONTEXT).rev().copied().collect()
    };
    match e.kind {
        ErrorKind::Exhausted => trace!("input ended early"),
        ErrorKind::Mismatch(t) | ErrorKind::Predicate(t) => trace!("stopped at {}", t),
        ErrorKind::Leftover => trace!("{} tokens left", rest.len()),
        ErrorKind::TooDeep => debug!("expression is nested deeper than {} levels", MAX_NESTING),
    }
    CalcError::Parse(format_tokens(&near))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Constant, Operator};
    use crate::value::Value;

    fn d(n: u8) -> Token {
        Token::Digit(n)
    }

    fn op(o: Operator) -> Token {
        Token::Operator(o)
    }

    #[test]
    fn test_calculate() {
        assert_eq!(calculate(&[d(6), op(Operator::Plus), d(7)]), Ok(Value::new(13.0, 0.0)));
        let tokens = [
            d(1),
            op(Operator::Plus),
            d(2),
            op(Operator::Times),
            d(3),
            op(Operator::Power),
            d(4),
        ];
        assert_eq!(calculate(&tokens), Ok(Value::new(163.0, 0.0)));
        assert_eq!(describe(&tokens), Ok("((1)+((2)×((3)^(4))))".to_string()));
    }

    #[test]
    fn test_implicit_multiplication() {
        let tokens = [d(8), Token::Constant(Constant::Pi)];
        assert_eq!(describe(&tokens), Ok("(8*π)".to_string()));
        assert_eq!(calculate(&tokens), Ok(Value::new(8.0 * std::f64::consts::PI, 0.0)));
    }

    #[test]
    fn test_empty() {
        assert_eq!(calculate(&[]), Err(CalcError::TokensEmpty));
    }

    #[test]
    fn test_parse_errors() {
        // "2×−3" stops at the minus sign
        let tokens = [d(2), op(Operator::Times), op(Operator::Minus), d(3)];
        assert_eq!(calculate(&tokens), Err(CalcError::Parse("2×".to_string())));

        // unmatched ")" runs out of input while looking for "("
        let tokens = [d(1), op(Operator::Plus), d(2), Token::Close];
        assert_eq!(calculate(&tokens), Err(CalcError::Parse("1+2".to_string())));

        let tokens = [Token::Open, d(5)];
        assert_eq!(calculate(&tokens), Err(CalcError::Parse("(".to_string())));

        let tokens = [op(Operator::Times), d(5)];
        assert_eq!(calculate(&tokens), Err(CalcError::Parse("×".to_string())));
    }

    fn long_sum(terms: usize) -> Vec<Token> {
        let mut tokens = vec![d(1)];
        for _ in 1..terms {
            tokens.push(op(Operator::Plus));
            tokens.push(d(1));
        }
        tokens
    }

    fn brackets(depth: usize) -> Vec<Token> {
        let mut tokens = vec![Token::Open; depth];
        tokens.push(d(1));
        tokens.extend(vec![Token::Close; depth]);
        tokens
    }

    #[test]
    fn test_long_input() {
        assert_eq!(calculate(&long_sum(200)), Ok(Value::new(200.0, 0.0)));
        assert_eq!(calculate(&brackets(60)), Ok(Value::new(1.0, 0.0)));

        // deeper than the grammar allows: an error, not a stack overflow
        match calculate(&long_sum(5_000)) {
            Err(CalcError::Parse(near)) => assert_eq!(near, "1+1"),
            other => panic!("unexpected {:?}", other),
        }
        match calculate(&brackets(1_000)) {
            Err(CalcError::Parse(near)) => assert_eq!(near, ")))"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        assert!(calculate(&brackets(1_000)).is_err());
        assert_eq!(calculate(&brackets(60)), Ok(Value::new(1.0, 0.0)));
        assert_eq!(calculate(&long_sum(3)), Ok(Value::new(3.0, 0.0)));
    }

    #[test]
    fn test_runtime_errors() {
        let tokens = [d(0), Token::Point, d(1), Token::Point, d(0)];
        assert_eq!(describe(&tokens), Ok("(0.1.0)".to_string()));
        assert_eq!(
            calculate(&tokens),
            Err(CalcError::Runtime("Too many '.' in a number: 0.1.0".to_string()))
        );

        let tokens = [d(3), Token::Constant(Constant::I), op(Operator::Modulo), d(2)];
        assert_eq!(
            calculate(&tokens),
            Err(CalcError::Runtime("Modulo requires real operands: (3i) mod (2)".to_string()))
        );

        let tokens = [d(2), Token::Point, d(5), op(Operator::Root), d(9)];
        assert_eq!(
            calculate(&tokens),
            Err(CalcError::Runtime("Root index must be a whole real number: (2.5)√(9)".to_string()))
        );

        assert_eq!(
            calculate(&[d(12)]),
            Err(CalcError::Runtime("Not a digit: 12".to_string()))
        );
        assert!(calculate(&[d(4), d(200), op(Operator::Plus), d(1)]).is_err());

        assert_eq!(
            calculate(&[Token::Point]),
            Err(CalcError::Runtime("'.' is not a number".to_string()))
        );
    }
}
