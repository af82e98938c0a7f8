//! Calculator grammar over a **reversed** token stream.
//!
//! Arithmetic is left associative, `8−3−2` is `(8−3)−2`, and its natural rule
//! `expr → expr op term` is left recursive. A recursive descent parser built
//! from combinators would recurse forever on it. Reading the tokens from the
//! last one to the first turns the same rule into `expr → term op expr`, which
//! is right recursive and terminates. The operand that comes first in the
//! reversed stream is the right-hand side of the operation, the recursive
//! remainder is its left-hand side, so the tree still groups to the left.
//!
//! Consequences of the reversal:
//! * a postfix operator (`!`) is met before its operand,
//! * a function name is met after the closing and opening brackets of its
//!   argument,
//! * digits and implicit-multiplication factors arrive backwards and are
//!   put back in order when their node is built.
//!
//! Every tier is tried in the same order: `near infix expr`, then
//! `near prefix`, then `near` alone; independently `postfix expr`. The near
//! operand of a tier is an expression of the next tighter tier, the tightest
//! tier uses one or more factors.
//!
//! Each binary operator and each bracket pair costs stack, so the number of
//! active sub-expressions is capped at [`MAX_NESTING`]. An input that needs
//! more fails with [`ErrorKind::TooDeep`](crate::combinator::ErrorKind).

use crate::ast::Node;
use crate::combinator::{item, satisfy, Parser, Stream};
use crate::token::{Function, InfixOp, Numeric, PostfixOp, Precedence, PrefixOp, Token};

/// Sub-expressions that may be open at once: a chain of about 250 additions,
/// or about 80 nested brackets (each pair opens all three tiers)
pub const MAX_NESTING: usize = 256;

/// Input of the calculator grammar: tokens from the last typed to the first
pub type Tokens = Stream<Token>;
pub type TokenParser<O> = Parser<Tokens, O>;

/// Builds the input for [`expression`] from tokens in typing order
pub fn reversed(tokens: &[Token]) -> Tokens {
    Stream::new(tokens.iter().rev().copied().collect())
}

/// Expression whose loosest operator is of `tier`
pub fn expression(tier: Precedence) -> TokenParser<Node> {
    let operations = operand(tier).flat_map(move |rhs| {
        let with_infix = {
            let rhs = rhs.clone();
            infix(tier).flat_map(move |op| {
                let rhs = rhs.clone();
                deferred(tier).map(move |lhs| Node::infix(lhs, rhs.clone(), op))
            })
        };
        let with_prefix = {
            let rhs = rhs.clone();
            prefix(tier).map(move |op| Node::prefix(rhs.clone(), op))
        };
        with_infix.or_else(with_prefix).or_else(Parser::pure(rhs))
    });

    let with_postfix =
        postfix(tier).flat_map(move |op| deferred(tier).map(move |lhs| Node::postfix(lhs, op)));

    operations.or_else(with_postfix)
}

fn deferred(tier: Precedence) -> TokenParser<Node> {
    Parser::nested(MAX_NESTING, move || expression(tier))
}

fn operand(tier: Precedence) -> TokenParser<Node> {
    match tier.higher() {
        Some(higher) => deferred(higher),
        None => factors(),
    }
}

/// One or more juxtaposed factors: implicit multiplication
fn factors() -> TokenParser<Node> {
    factor().many(false).map(|mut nodes| {
        nodes.reverse();
        Node::Group(nodes)
    })
}

fn factor() -> TokenParser<Node> {
    bracketed().or_else(number()).or_else(constant())
}

// `)` expr `(` [function], as seen from the end
fn bracketed() -> TokenParser<Node> {
    item(close).flat_map(|_| {
        deferred(Precedence::Low).flat_map(|inner| {
            item(open).flat_map(move |_| {
                let arg = inner.clone();
                function()
                    .map(move |func| Node::apply(arg.clone(), func))
                    .or_else(Parser::pure(inner.clone()))
            })
        })
    })
}

/// Digits and decimal points. A lone key stays a leaf so that a bare `.`
/// fails when it is evaluated
fn number() -> TokenParser<Node> {
    satisfy(Token::numeric, Numeric::is_digit).many(false).map(|mut keys| {
        keys.reverse();
        if keys.len() == 1 {
            return Node::Leaf(keys[0]);
        }
        let digits = keys
            .iter()
            .map(|key| match key {
                Numeric::Digit(d) => Some(*d),
                _ => None,
            })
            .collect();
        Node::Number(digits)
    })
}

fn constant() -> TokenParser<Node> {
    satisfy(Token::numeric, Numeric::is_constant).map(Node::Leaf)
}

fn infix(tier: Precedence) -> TokenParser<InfixOp> {
    satisfy(Token::infix, move |op: &InfixOp| op.precedence() == tier)
}

fn prefix(tier: Precedence) -> TokenParser<PrefixOp> {
    satisfy(Token::prefix, move |op: &PrefixOp| op.precedence() == tier)
}

fn postfix(tier: Precedence) -> TokenParser<PostfixOp> {
    satisfy(Token::postfix, move |op: &PostfixOp| op.precedence() == tier)
}

fn function() -> TokenParser<Function> {
    item(Token::function)
}

fn open(token: &Token) -> Option<()> {
    if token.is_open() {
        Some(())
    } else {
        None
    }
}

fn close(token: &Token) -> Option<()> {
    if token.is_close() {
        Some(())
    } else {
        None
    }
}
