use num_complex::Complex;
use num_traits::{One, Zero};
use std::f64::consts;

use crate::errors::*;
use crate::format::format;

/// The unit of computation: a double precision complex number
pub type Value = Complex<f64>;

// imaginary parts below this are treated as rounding noise by real-only operations
const REAL_EPSILON: f64 = 1e-12;
// exponents up to this magnitude use repeated squaring instead of exp/ln
const MAX_INT_POWER: f64 = 64.0;

const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)]
const LANCZOS_COEF: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];
// n! does not fit f64 for n > 170
const MAX_EXACT_FACTORIAL: f64 = 170.0;

pub(crate) fn is_real(v: Value) -> bool {
    v.im.abs() <= REAL_EPSILON
}

fn is_whole(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0
}

// operand text for error messages: "(3i)"
fn operand(v: Value) -> String {
    format!("({})", format(v))
}

/// Gamma function for real arguments (Lanczos approximation, reflection
/// formula below 0.5). Returns NaN at the poles
pub fn gamma(x: f64) -> f64 {
    if x <= 0.0 && is_whole(x) {
        return f64::NAN;
    }
    if x < 0.5 {
        return consts::PI / ((consts::PI * x).sin() * gamma(1.0 - x));
    }

    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let mut acc = LANCZOS_COEF[0];
    for (i, c) in LANCZOS_COEF.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    (2.0 * consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
}

/// Returns factorial of a real number as Γ(x+1).
/// Small non-negative integers are multiplied out exactly.
/// Complex numbers generate an error
pub fn factorial(v: Value) -> Result<Value, CalcError> {
    if !is_real(v) {
        return Err(CalcError::Runtime(format!("Factorial requires a real operand: {}!", operand(v))));
    }

    let x = v.re;
    if is_whole(x) && x >= 0.0 && x <= MAX_EXACT_FACTORIAL {
        let mut res = 1.0f64;
        let mut cnt = 2.0f64;
        while cnt <= x {
            res *= cnt;
            cnt += 1.0;
        }
        return Ok(Value::new(res, 0.0));
    }
    Ok(Value::new(gamma(x + 1.0), 0.0))
}

/// Complex product. Real operands are multiplied as reals so that
/// infinities do not leak NaN into the imaginary part
pub fn multiply(lhs: Value, rhs: Value) -> Value {
    if lhs.im == 0.0 && rhs.im == 0.0 {
        return Value::new(lhs.re * rhs.re, 0.0);
    }
    lhs * rhs
}

/// Complex quotient following IEEE semantics: `1÷0` is infinity, `0÷0` is NaN
pub fn divide(lhs: Value, rhs: Value) -> Value {
    if rhs.im == 0.0 {
        return Value::new(lhs.re / rhs.re, if lhs.im == 0.0 { 0.0 } else { lhs.im / rhs.re });
    }
    lhs / rhs
}

/// Raises a number into arbitrary complex power.
/// Real numbers stay on the real axis whenever the result is real
pub fn power(base: Value, exp: Value) -> Value {
    if is_real(base) && is_real(exp) && (base.re >= 0.0 || is_whole(exp.re)) {
        return Value::new(base.re.powf(exp.re), 0.0);
    }
    if is_real(exp) && is_whole(exp.re) && exp.re.abs() <= MAX_INT_POWER {
        return base.powi(exp.re as i32);
    }
    if base.is_zero() {
        if exp.re > 0.0 {
            return Value::zero();
        }
        if exp.is_zero() {
            return Value::one();
        }
    }
    base.powc(exp)
}

/// Returns `index`-th root of `radicand`. The index must be a whole real
/// number. Odd roots of negative real numbers are real: `3√-8 = -2`
pub fn root(index: Value, radicand: Value) -> Result<Value, CalcError> {
    if !is_real(index) || !is_whole(index.re) {
        return Err(CalcError::Runtime(format!(
            "Root index must be a whole real number: {}√{}",
            operand(index),
            operand(radicand)
        )));
    }

    let n = index.re;
    if is_real(radicand) {
        let x = radicand.re;
        if x >= 0.0 {
            let r = if n == 2.0 { x.sqrt() } else { x.powf(1.0 / n) };
            return Ok(Value::new(r, 0.0));
        }
        if (n % 2.0).abs() == 1.0 {
            return Ok(Value::new(-(-x).powf(1.0 / n), 0.0));
        }
        if n == 2.0 {
            return Ok(Value::new(0.0, (-x).sqrt()));
        }
    }
    if n == 2.0 {
        return Ok(radicand.sqrt());
    }
    Ok(radicand.powf(1.0 / n))
}

/// Remainder of a truncating division. Both operands must be real
pub fn modulo(lhs: Value, rhs: Value) -> Result<Value, CalcError> {
    if !is_real(lhs) || !is_real(rhs) {
        return Err(CalcError::Runtime(format!(
            "Modulo requires real operands: {} mod {}",
            operand(lhs),
            operand(rhs)
        )));
    }
    Ok(Value::new(lhs.re % rhs.re, 0.0))
}

/// Logarithm with a real base. Positive real arguments use the f64 routine
/// so that `log(1000)` is exactly 3
pub(crate) fn log_base(v: Value, base: f64) -> Value {
    if is_real(v) && v.re > 0.0 {
        let re = if base == 10.0 {
            v.re.log10()
        } else if base == 2.0 {
            v.re.log2()
        } else {
            v.re.log(base)
        };
        return Value::new(re, 0.0);
    }
    v.ln() / base.ln()
}
