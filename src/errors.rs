use num_complex::Complex;
use thiserror::Error;

/// Errors returned by the calculator. None of them is fatal: the caller
/// decides whether to show the message, clear the buffer, or ignore it.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CalcError {
    /// Token sequence was empty at evaluation time
    #[error("Nothing to calculate")]
    TokensEmpty,

    /// Tokens do not match the grammar. Holds the display text of the tokens
    /// closest to the point where parsing stopped
    #[error("Unexpected token near '{0}'")]
    Parse(String),

    /// Expression is syntactically valid but violates a domain constraint
    #[error("{0}")]
    Runtime(String),

    /// Display text could not be split into tokens
    #[error("Failed to read expression: {0}")]
    Lex(String),
}

/// Expression calculation result: either value or error
pub type CalcResult = Result<Complex<f64>, CalcError>;
