use num_traits::One;
use std::fmt;

use crate::errors::*;
use crate::token::{digit_value, Function, InfixOp, Numeric, PostfixOp, PrefixOp};
use crate::value::{self, Value};

/// Parsed expression. Built fresh for every calculation and dropped after it
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Single digit or constant
    Leaf(Numeric),
    /// Several digit keys; `None` marks a decimal point
    Number(Vec<Option<u8>>),
    /// Juxtaposed factors multiplied together: `2π`, `sin(0)cos(0)`
    Group(Vec<Node>),
    Infix {
        lhs: Box<Node>,
        rhs: Box<Node>,
        op: InfixOp,
    },
    Prefix {
        rhs: Box<Node>,
        op: PrefixOp,
    },
    Postfix {
        lhs: Box<Node>,
        op: PostfixOp,
    },
    Apply {
        arg: Box<Node>,
        func: Function,
    },
}

impl Node {
    pub fn infix(lhs: Node, rhs: Node, op: InfixOp) -> Node {
        Node::Infix {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            op,
        }
    }

    pub fn prefix(rhs: Node, op: PrefixOp) -> Node {
        Node::Prefix { rhs: Box::new(rhs), op }
    }

    pub fn postfix(lhs: Node, op: PostfixOp) -> Node {
        Node::Postfix { lhs: Box::new(lhs), op }
    }

    pub fn apply(arg: Node, func: Function) -> Node {
        Node::Apply {
            arg: Box::new(arg),
            func,
        }
    }

    /// Computes the value of the expression
    pub fn eval(&self) -> Result<Value, CalcError> {
        match self {
            Node::Leaf(n) => n.value(),
            Node::Number(digits) => self.eval_number(digits),
            Node::Group(factors) => {
                let mut res = Value::one();
                for factor in factors {
                    res = value::multiply(res, factor.eval()?);
                }
                Ok(res)
            }
            Node::Infix { lhs, rhs, op } => op.apply(lhs.eval()?, rhs.eval()?),
            Node::Prefix { rhs, op } => op.apply(rhs.eval()?),
            Node::Postfix { lhs, op } => op.apply(lhs.eval()?),
            Node::Apply { arg, func } => Ok(func.apply(arg.eval()?)),
        }
    }

    fn eval_number(&self, digits: &[Option<u8>]) -> Result<Value, CalcError> {
        let mut parts = digits.split(|d| d.is_none());
        let int_part = parts.next().unwrap_or(&[]);
        let frac_part = parts.next().unwrap_or(&[]);
        if parts.next().is_some() {
            return Err(CalcError::Runtime(format!("Too many '.' in a number: {}", self)));
        }

        let mut int = 0.0f64;
        for d in int_part.iter().flatten() {
            int = int * 10.0 + digit_value(*d)?;
        }
        let mut frac = 0.0f64;
        for d in frac_part.iter().rev().flatten() {
            frac = (frac + digit_value(*d)?) / 10.0;
        }
        Ok(Value::new(int + frac, 0.0))
    }
}

/// Description of the parse tree: every operation is wrapped in brackets,
/// implicit multiplication is spelled with `*`. The text can be read back
/// by the lexer and gives the same value
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Leaf(n) => write!(f, "{}", n.text()),
            Node::Number(digits) => {
                for d in digits {
                    match d {
                        Some(d) => write!(f, "{}", d)?,
                        None => write!(f, ".")?,
                    }
                }
                Ok(())
            }
            Node::Group(factors) => {
                write!(f, "(")?;
                for (i, factor) in factors.iter().enumerate() {
                    if i != 0 {
                        write!(f, "*")?;
                    }
                    write!(f, "{}", factor)?;
                }
                write!(f, ")")
            }
            Node::Infix { lhs, rhs, op } => write!(f, "({}{}{})", lhs, op.text(), rhs),
            Node::Prefix { rhs, op } => write!(f, "({}{})", op.text(), rhs),
            Node::Postfix { lhs, op } => write!(f, "({}{})", lhs, op.text()),
            Node::Apply { arg, func } => write!(f, "{}({})", func.text(), arg),
        }
    }
}
