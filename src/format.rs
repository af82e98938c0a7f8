//! Locale-free rendering of complex values and token sequences.
//!
//! Each component of a complex number is classified on its own (NaN, zero,
//! fixed point, scientific) and the two parts are then joined by a fixed
//! table that drops a zero part and a unit coefficient of `i`.

use crate::token::Token;
use crate::value::Value;

/// Thresholds of the formatter
#[derive(Clone, Debug, PartialEq)]
pub struct FormatOptions {
    /// Components with a smaller magnitude are shown as `0`
    pub epsilon: f64,
    /// Smallest magnitude shown in fixed point
    pub fixed_min: f64,
    /// Magnitudes from this one up are shown in scientific notation
    pub fixed_max: f64,
    pub max_significant: usize,
    pub max_fraction: usize,
}

impl Default for FormatOptions {
    fn default() -> FormatOptions {
        FormatOptions {
            epsilon: 1e-15,
            fixed_min: 1e-5,
            fixed_max: 1e10,
            max_significant: 10,
            max_fraction: 10,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Part {
    NaN,
    Zero,
    Text { negative: bool, magnitude: String },
}

fn classify(f: f64, opts: &FormatOptions) -> Part {
    if f.is_nan() {
        return Part::NaN;
    }
    let abs = f.abs();
    if abs < opts.epsilon {
        return Part::Zero;
    }
    let magnitude = if abs.is_infinite() {
        "∞".to_string()
    } else if abs >= opts.fixed_min && abs < opts.fixed_max {
        fixed(abs, opts).unwrap_or_else(|| scientific(abs, opts))
    } else {
        scientific(abs, opts)
    };
    Part::Text {
        negative: f < 0.0,
        magnitude,
    }
}

// keep at most `max_significant` digits, but no more than `max_fraction` after the point.
// `None` when rounding carries the value up to `fixed_max`
fn fixed(abs: f64, opts: &FormatOptions) -> Option<String> {
    let int_digits = abs.log10().floor() as i64 + 1;
    let decimals = (opts.max_significant as i64 - int_digits).max(0).min(opts.max_fraction as i64) as usize;
    let text = format!("{:.*}", decimals, abs);
    let rounded: f64 = text.parse().ok()?;
    if rounded >= opts.fixed_max {
        return None;
    }
    Some(trim_zeros(text))
}

fn scientific(abs: f64, opts: &FormatOptions) -> String {
    let text = format!("{:.*e}", opts.max_significant.saturating_sub(1), abs);
    match text.split_once('e') {
        Some((mantissa, exp)) => format!("{}E{}", trim_zeros(mantissa.to_string()), exp),
        None => text,
    }
}

fn trim_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn sign(negative: bool) -> &'static str {
    if negative {
        "-"
    } else {
        ""
    }
}

/// Renders a complex value with the default thresholds: `0`, `1+i`, `-2-2i`,
/// `1E20i`
pub fn format(v: Value) -> String {
    format_with(v, &FormatOptions::default())
}

/// Renders a complex value with custom thresholds
pub fn format_with(v: Value, opts: &FormatOptions) -> String {
    let re = classify(v.re, opts);
    let im = classify(v.im, opts);

    match (re, im) {
        (Part::NaN, Part::NaN) => "NaN".to_string(),
        (Part::Zero, Part::Zero) => "0".to_string(),
        (re, Part::Zero) => part_text(&re),
        (Part::Zero, Part::Text { negative, magnitude }) => {
            if magnitude == "1" {
                format!("{}i", sign(negative))
            } else {
                format!("{}{}i", sign(negative), magnitude)
            }
        }
        (Part::Zero, Part::NaN) => "NaNi".to_string(),
        (re, Part::Text { negative, magnitude }) => {
            let op = if negative { "-" } else { "+" };
            if magnitude == "1" {
                format!("{}{}i", part_text(&re), op)
            } else {
                format!("{}{}{}i", part_text(&re), op, magnitude)
            }
        }
        (re, Part::NaN) => format!("{}+NaNi", part_text(&re)),
    }
}

fn part_text(p: &Part) -> String {
    match p {
        Part::NaN => "NaN".to_string(),
        Part::Zero => "0".to_string(),
        Part::Text { negative, magnitude } => format!("{}{}", sign(*negative), magnitude),
    }
}

/// Display text of a token sequence, e.g. the expression being typed
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text()).collect()
}
