//! # Token calculator
//!
//! Evaluates expressions typed on a calculator keyboard. The input is not a
//! string but the sequence of pressed keys: digits, a decimal point, the
//! constants `π`, `e`, `i` and `Ans`, operators, brackets and functions. All
//! arithmetic is done with double precision complex numbers, so `√(−4)`
//! evaluates to `2i` and `e^(πi)` to `-1`.
//!
//! Operators (starting from highest priority):
//! * `^`, `√`, `mod`, `!` - power, root (`3√8` is a cube root, `√9` a square
//!   root), truncating remainder, and factorial (`0.5!` is Γ(1.5))
//! * `×`, `÷` - multiplication and division
//! * `+`, `−` - addition and subtraction, also unary plus and minus
//!
//! Binary operators of the same priority are left associative: `8−3−2` is
//! `3` and `2^3^2` is `64`. Keys written next to each other are multiplied:
//! `2π`, `(1+2)(3+4)`, `3sin(0.5)`.
//!
//! The list of supported functions:
//! * trigonometric functions (including inverted ones): sin, cos, tan, asin, acos, atan
//! * hyperbolic functions (including inverted ones): sinh, cosh, tanh, asinh, acosh, atanh
//! * logarithms: log (base 10), lg (base 2), ln
//!
//! A function always takes a bracketed argument: `sin(π)`.
//!
//! Results are rendered without locale: `1+i`, `-2-2i`, `0.3333333333`,
//! `1E20`. Components smaller than `1e-15` are shown as zero, so `e^(πi)`
//! prints `-1` and not `-1+1.2246E-16i`.
//!
//! Besides the key based API ([`calculate`], [`describe`]) the crate reads
//! display text: [`eval`] splits a string like `2pi + sin(1)` into keys,
//! evaluates it, and keeps the result as `Ans` for the next expression.

#[macro_use]
extern crate pest_derive;

pub mod ast;
pub mod calc;
pub mod combinator;
pub mod errors;
pub mod format;
pub mod grammar;
pub mod parse;
pub mod token;
pub mod value;

pub use crate::calc::{calculate, describe};
pub use crate::errors::{CalcError, CalcResult};
pub use crate::format::{format, format_tokens, format_with, FormatOptions};
pub use crate::parse::{eval, tokenize, CalcState};
pub use crate::token::{Constant, Function, Operator, Token};
pub use crate::value::Value;
