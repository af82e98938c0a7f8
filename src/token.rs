//! Closed vocabulary of calculator keys.
//!
//! Every key is a plain `Copy` value. Operators carry their fixity and
//! precedence as data, functions and constants carry their computation, so the
//! grammar and the evaluator never need dynamic dispatch.

use lazy_static::lazy_static;
use std::f64::consts;
use std::fmt;

use crate::errors::*;
use crate::value::{self, Value};

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Binding strength of an operator. Ordered from the loosest to the tightest
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// `+`, `−`
    Low,
    /// `×`, `÷`
    Middle,
    /// `^`, `√`, `mod`, `!`
    High,
}

impl Precedence {
    /// The next tighter tier, `None` for the tightest one
    pub fn higher(self) -> Option<Precedence> {
        match self {
            Precedence::Low => Some(Precedence::Middle),
            Precedence::Middle => Some(Precedence::High),
            Precedence::High => None,
        }
    }
}

/// Symbolic constants
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constant {
    Pi,
    E,
    /// Imaginary unit
    I,
    /// Result of a previous calculation
    Answer(Value),
}

impl Constant {
    pub fn value(&self) -> Value {
        match self {
            Constant::Pi => Value::new(consts::PI, 0.0),
            Constant::E => Value::new(consts::E, 0.0),
            Constant::I => Value::i(),
            Constant::Answer(v) => *v,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
            Constant::I => "i",
            Constant::Answer(..) => "Ans",
        }
    }
}

/// Tokens that may form a numeric leaf of an expression
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Digit(u8),
    Point,
    Constant(Constant),
}

impl Numeric {
    /// Digits and the decimal point build numbers, constants stand alone
    pub fn is_digit(&self) -> bool {
        matches!(self, Numeric::Digit(..) | Numeric::Point)
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Numeric::Constant(..))
    }

    /// Value of a single key. A bare decimal point is not a number
    pub fn value(&self) -> Result<Value, CalcError> {
        match self {
            Numeric::Digit(d) => Ok(Value::new(digit_value(*d)?, 0.0)),
            Numeric::Point => Err(CalcError::Runtime("'.' is not a number".to_string())),
            Numeric::Constant(c) => Ok(c.value()),
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Numeric::Digit(d) => digit_text(*d),
            Numeric::Point => ".",
            Numeric::Constant(c) => c.text(),
        }
    }
}

/// Numeric value of a digit key. Only 0 to 9 are keys of the keyboard
pub(crate) fn digit_value(d: u8) -> Result<f64, CalcError> {
    if d > 9 {
        return Err(CalcError::Runtime(format!("Not a digit: {}", d)));
    }
    Ok(f64::from(d))
}

fn digit_text(d: u8) -> &'static str {
    DIGITS.get(usize::from(d)).copied().unwrap_or("?")
}

/// Operator keys. A key may act in more than one position: `−` subtracts or
/// negates, `√` is either `a√b` or `√b`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Times,
    Divide,
    Power,
    Root,
    Modulo,
    Factorial,
}

impl Operator {
    pub fn text(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "−",
            Operator::Times => "×",
            Operator::Divide => "÷",
            Operator::Power => "^",
            Operator::Root => "√",
            Operator::Modulo => "mod",
            Operator::Factorial => "!",
        }
    }

    /// Meaning of the key between two operands
    pub fn infix(&self) -> Option<InfixOp> {
        match self {
            Operator::Plus => Some(InfixOp::Add),
            Operator::Minus => Some(InfixOp::Subtract),
            Operator::Times => Some(InfixOp::Multiply),
            Operator::Divide => Some(InfixOp::Divide),
            Operator::Power => Some(InfixOp::Power),
            Operator::Root => Some(InfixOp::Root),
            Operator::Modulo => Some(InfixOp::Modulo),
            Operator::Factorial => None,
        }
    }

    /// Meaning of the key before its operand
    pub fn prefix(&self) -> Option<PrefixOp> {
        match self {
            Operator::Plus => Some(PrefixOp::Plus),
            Operator::Minus => Some(PrefixOp::Negate),
            Operator::Root => Some(PrefixOp::SquareRoot),
            _ => None,
        }
    }

    /// Meaning of the key after its operand
    pub fn postfix(&self) -> Option<PostfixOp> {
        match self {
            Operator::Factorial => Some(PostfixOp::Factorial),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    /// `a√b` is the a-th root of b
    Root,
    Modulo,
}

impl InfixOp {
    pub fn precedence(&self) -> Precedence {
        match self {
            InfixOp::Add | InfixOp::Subtract => Precedence::Low,
            InfixOp::Multiply | InfixOp::Divide => Precedence::Middle,
            InfixOp::Power | InfixOp::Root | InfixOp::Modulo => Precedence::High,
        }
    }

    pub fn text(&self) -> &'static str {
        self.operator().text()
    }

    fn operator(&self) -> Operator {
        match self {
            InfixOp::Add => Operator::Plus,
            InfixOp::Subtract => Operator::Minus,
            InfixOp::Multiply => Operator::Times,
            InfixOp::Divide => Operator::Divide,
            InfixOp::Power => Operator::Power,
            InfixOp::Root => Operator::Root,
            InfixOp::Modulo => Operator::Modulo,
        }
    }

    pub fn apply(&self, lhs: Value, rhs: Value) -> Result<Value, CalcError> {
        match self {
            InfixOp::Add => Ok(lhs + rhs),
            InfixOp::Subtract => Ok(lhs - rhs),
            InfixOp::Multiply => Ok(value::multiply(lhs, rhs)),
            InfixOp::Divide => Ok(value::divide(lhs, rhs)),
            InfixOp::Power => Ok(value::power(lhs, rhs)),
            InfixOp::Root => value::root(lhs, rhs),
            InfixOp::Modulo => value::modulo(lhs, rhs),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Plus,
    Negate,
    SquareRoot,
}

impl PrefixOp {
    pub fn precedence(&self) -> Precedence {
        match self {
            PrefixOp::Plus | PrefixOp::Negate => Precedence::Low,
            PrefixOp::SquareRoot => Precedence::High,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            PrefixOp::Plus => Operator::Plus.text(),
            PrefixOp::Negate => Operator::Minus.text(),
            PrefixOp::SquareRoot => Operator::Root.text(),
        }
    }

    pub fn apply(&self, rhs: Value) -> Result<Value, CalcError> {
        match self {
            PrefixOp::Plus => Ok(rhs),
            // 0 − x keeps a zero imaginary part positive
            PrefixOp::Negate => Ok(Value::new(0.0, 0.0) - rhs),
            PrefixOp::SquareRoot => value::root(Value::new(2.0, 0.0), rhs),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    /// `x!` is Γ(x+1)
    Factorial,
}

impl PostfixOp {
    pub fn precedence(&self) -> Precedence {
        Precedence::High
    }

    pub fn text(&self) -> &'static str {
        Operator::Factorial.text()
    }

    pub fn apply(&self, lhs: Value) -> Result<Value, CalcError> {
        match self {
            PostfixOp::Factorial => value::factorial(lhs),
        }
    }
}

/// Named unary functions. All of them are total over complex numbers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    /// base 10
    Log,
    /// base 2
    Lg,
    Ln,
}

impl Function {
    pub fn text(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Asinh => "asinh",
            Function::Acosh => "acosh",
            Function::Atanh => "atanh",
            Function::Log => "log",
            Function::Lg => "lg",
            Function::Ln => "ln",
        }
    }

    pub fn apply(&self, z: Value) -> Value {
        match self {
            Function::Sin => z.sin(),
            Function::Cos => z.cos(),
            Function::Tan => z.tan(),
            Function::Asin => z.asin(),
            Function::Acos => z.acos(),
            Function::Atan => z.atan(),
            Function::Sinh => z.sinh(),
            Function::Cosh => z.cosh(),
            Function::Tanh => z.tanh(),
            Function::Asinh => z.asinh(),
            Function::Acosh => z.acosh(),
            Function::Atanh => z.atanh(),
            Function::Log => value::log_base(z, 10.0),
            Function::Lg => value::log_base(z, 2.0),
            Function::Ln => {
                if z.im == 0.0 && z.re > 0.0 {
                    Value::new(z.re.ln(), 0.0)
                } else {
                    z.ln()
                }
            }
        }
    }
}

/// A single key of the calculator keyboard
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    /// 0 to 9. Other values are shown as `?` and fail at evaluation
    Digit(u8),
    /// Decimal point
    Point,
    Constant(Constant),
    Operator(Operator),
    Open,
    Close,
    Function(Function),
}

lazy_static! {
    // display text and accepted aliases of every key without a payload
    static ref KEYWORDS: Vec<(&'static str, Token)> = {
        let mut words = vec![
            (".", Token::Point),
            (",", Token::Point),
            ("(", Token::Open),
            (")", Token::Close),
            ("π", Token::Constant(Constant::Pi)),
            ("pi", Token::Constant(Constant::Pi)),
            ("e", Token::Constant(Constant::E)),
            ("i", Token::Constant(Constant::I)),
            ("-", Token::Operator(Operator::Minus)),
            ("*", Token::Operator(Operator::Times)),
            ("·", Token::Operator(Operator::Times)),
            ("/", Token::Operator(Operator::Divide)),
            ("%", Token::Operator(Operator::Modulo)),
        ];
        for (d, text) in DIGITS.iter().enumerate() {
            words.push((*text, Token::Digit(d as u8)));
        }
        for op in ALL_OPERATORS.iter() {
            words.push((op.text(), Token::Operator(*op)));
        }
        for func in ALL_FUNCTIONS.iter() {
            words.push((func.text(), Token::Function(*func)));
        }
        words
    };
}

pub(crate) const ALL_OPERATORS: [Operator; 8] = [
    Operator::Plus,
    Operator::Minus,
    Operator::Times,
    Operator::Divide,
    Operator::Power,
    Operator::Root,
    Operator::Modulo,
    Operator::Factorial,
];

pub(crate) const ALL_FUNCTIONS: [Function; 15] = [
    Function::Sin,
    Function::Cos,
    Function::Tan,
    Function::Asin,
    Function::Acos,
    Function::Atan,
    Function::Sinh,
    Function::Cosh,
    Function::Tanh,
    Function::Asinh,
    Function::Acosh,
    Function::Atanh,
    Function::Log,
    Function::Lg,
    Function::Ln,
];

impl Token {
    /// Looks up a key by its display text or one of its ASCII aliases.
    /// `Ans` is not listed: its value belongs to the caller
    pub fn from_text(text: &str) -> Option<Token> {
        KEYWORDS.iter().find(|(word, _)| *word == text).map(|(_, token)| *token)
    }

    /// Canonical display text
    pub fn text(&self) -> &'static str {
        match self {
            Token::Digit(d) => digit_text(*d),
            Token::Point => ".",
            Token::Constant(c) => c.text(),
            Token::Operator(op) => op.text(),
            Token::Open => "(",
            Token::Close => ")",
            Token::Function(f) => f.text(),
        }
    }

    pub fn numeric(&self) -> Option<Numeric> {
        match self {
            Token::Digit(d) => Some(Numeric::Digit(*d)),
            Token::Point => Some(Numeric::Point),
            Token::Constant(c) => Some(Numeric::Constant(*c)),
            _ => None,
        }
    }

    pub fn infix(&self) -> Option<InfixOp> {
        match self {
            Token::Operator(op) => op.infix(),
            _ => None,
        }
    }

    pub fn prefix(&self) -> Option<PrefixOp> {
        match self {
            Token::Operator(op) => op.prefix(),
            _ => None,
        }
    }

    pub fn postfix(&self) -> Option<PostfixOp> {
        match self {
            Token::Operator(op) => op.postfix(),
            _ => None,
        }
    }

    pub fn function(&self) -> Option<Function> {
        match self {
            Token::Function(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        *self == Token::Open
    }

    pub fn is_close(&self) -> bool {
        *self == Token::Close
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl From<Constant> for Token {
    fn from(c: Constant) -> Self {
        Token::Constant(c)
    }
}

impl From<Operator> for Token {
    fn from(op: Operator) -> Self {
        Token::Operator(op)
    }
}

impl From<Function> for Token {
    fn from(f: Function) -> Self {
        Token::Function(f)
    }
}
