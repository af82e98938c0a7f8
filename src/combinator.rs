//! Backtracking parser combinators.
//!
//! A [`Parser`] is an immutable value wrapping a pure function from an input
//! to either a result plus the rest of the input, or a [`ParseError`]. Parsers
//! are cheap to clone and are combined by value; none of them holds mutable
//! state, so the same parser can be run any number of times.
//!
//! Failures are ordinary values. The only ambiguity rule is applied wherever
//! two alternatives both fail: the error that got further into the input
//! (shorter unconsumed remainder) is reported, the left one on a tie.
//!
//! Recursive grammars run on the call stack. The input counts how many
//! [`Parser::nested`] parsers are active on it, and passing the limit is the
//! one failure no alternative recovers from.

use std::fmt;
use std::rc::Rc;

/// Ordered input that can drop its front element and hand out the rest
pub trait Input: Clone {
    type Item: Clone;

    /// Splits off the front item, `None` when the input is exhausted
    fn uncons(&self) -> Option<(Self::Item, Self)>;

    /// Number of items not consumed yet
    fn remaining(&self) -> usize;

    /// Nesting level of recursive parsers working on this input
    fn depth(&self) -> usize;

    /// Same position at another nesting level
    fn at_depth(&self, depth: usize) -> Self;
}

/// Shared, cheaply clonable slice of items with a read position
#[derive(Clone)]
pub struct Stream<T> {
    items: Rc<[T]>,
    pos: usize,
    depth: usize,
}

impl<T: Clone> Stream<T> {
    pub fn new(items: Vec<T>) -> Self {
        Stream {
            items: items.into(),
            pos: 0,
            depth: 0,
        }
    }

    /// Items not consumed yet
    pub fn as_slice(&self) -> &[T] {
        &self.items[self.pos..]
    }
}

impl<T: Clone> Input for Stream<T> {
    type Item = T;

    fn uncons(&self) -> Option<(T, Self)> {
        let item = self.items.get(self.pos)?.clone();
        let rest = Stream {
            items: Rc::clone(&self.items),
            pos: self.pos + 1,
            depth: self.depth,
        };
        Some((item, rest))
    }

    fn remaining(&self) -> usize {
        self.items.len() - self.pos
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn at_depth(&self, depth: usize) -> Self {
        Stream {
            items: Rc::clone(&self.items),
            pos: self.pos,
            depth,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.items[self.pos..].iter()).finish()
    }
}

/// Why a parser failed
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind<T> {
    /// Input ended while an item was expected
    Exhausted,
    /// Front item is not of the expected kind
    Mismatch(T),
    /// Front item has the expected kind but was rejected by a predicate
    Predicate(T),
    /// Parser succeeded but input was not fully consumed
    Leftover,
    /// Too many nested parsers were active. Never recovered from
    TooDeep,
}

impl<T> ErrorKind<T> {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::TooDeep)
    }
}

/// Failure reason plus the input that was left when it happened
pub struct ParseError<I: Input> {
    pub kind: ErrorKind<I::Item>,
    pub rest: I,
}

impl<I: Input> Clone for ParseError<I> {
    fn clone(&self) -> Self {
        ParseError {
            kind: self.kind.clone(),
            rest: self.rest.clone(),
        }
    }
}

impl<I> fmt::Debug for ParseError<I>
where
    I: Input + fmt::Debug,
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParseError")
            .field("kind", &self.kind)
            .field("rest", &self.rest)
            .finish()
    }
}

impl<I: Input> ParseError<I> {
    pub fn new(kind: ErrorKind<I::Item>, rest: I) -> Self {
        ParseError { kind, rest }
    }

    /// Picks the error that consumed more input. `self` wins a tie, a fatal
    /// error wins over any other
    pub fn further(self, other: ParseError<I>) -> ParseError<I> {
        if self.kind.is_fatal() {
            return self;
        }
        if other.kind.is_fatal() || other.rest.remaining() < self.rest.remaining() {
            other
        } else {
            self
        }
    }
}

pub type ParseResult<I, O> = Result<(O, I), ParseError<I>>;

/// A composable parser from input `I` to output `O`
pub struct Parser<I: Input, O> {
    run: Rc<dyn Fn(I) -> ParseResult<I, O>>,
}

impl<I: Input, O> Clone for Parser<I, O> {
    fn clone(&self) -> Self {
        Parser {
            run: Rc::clone(&self.run),
        }
    }
}

impl<I: Input + 'static, O: 'static> Parser<I, O> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(I) -> ParseResult<I, O> + 'static,
    {
        Parser { run: Rc::new(f) }
    }

    /// Runs the parser on `input`, returning the result and the rest
    pub fn parse(&self, input: I) -> ParseResult<I, O> {
        (self.run)(input)
    }

    /// Runs the parser and requires it to consume the whole input
    pub fn parse_all(&self, input: I) -> Result<O, ParseError<I>> {
        let (out, rest) = self.parse(input)?;
        if rest.remaining() != 0 {
            return Err(ParseError::new(ErrorKind::Leftover, rest));
        }
        Ok(out)
    }

    /// Always succeeds with `value` without consuming anything
    pub fn pure(value: O) -> Self
    where
        O: Clone,
    {
        Parser::new(move |input| Ok((value.clone(), input)))
    }

    /// Always fails as if the input was exhausted
    pub fn fail() -> Self {
        Parser::new(|input| Err(ParseError::new(ErrorKind::Exhausted, input)))
    }

    /// Defers construction of a parser until it runs. Needed for grammars
    /// whose rules refer to each other
    pub fn lazy<F>(make: F) -> Self
    where
        F: Fn() -> Parser<I, O> + 'static,
    {
        Parser::new(move |input| make().parse(input))
    }

    /// [`Parser::lazy`] that counts itself as one nesting level of the input.
    /// Fails with [`ErrorKind::TooDeep`] when `limit` levels are already active
    pub fn nested<F>(limit: usize, make: F) -> Self
    where
        F: Fn() -> Parser<I, O> + 'static,
    {
        Parser::new(move |input: I| {
            let depth = input.depth();
            if depth >= limit {
                return Err(ParseError::new(ErrorKind::TooDeep, input));
            }
            let (out, rest) = make().parse(input.at_depth(depth + 1))?;
            Ok((out, rest.at_depth(depth)))
        })
    }

    pub fn map<O2: 'static, F>(self, f: F) -> Parser<I, O2>
    where
        F: Fn(O) -> O2 + 'static,
    {
        Parser::new(move |input| self.parse(input).map(|(out, rest)| (f(out), rest)))
    }

    /// Sequencing: feeds the output into `f` and runs the parser it returns
    /// on the remaining input
    pub fn flat_map<O2: 'static, F>(self, f: F) -> Parser<I, O2>
    where
        F: Fn(O) -> Parser<I, O2> + 'static,
    {
        Parser::new(move |input| {
            let (out, rest) = self.parse(input)?;
            f(out).parse(rest)
        })
    }

    pub fn map_error<F>(self, f: F) -> Parser<I, O>
    where
        F: Fn(ParseError<I>) -> ParseError<I> + 'static,
    {
        Parser::new(move |input| self.parse(input).map_err(&f))
    }

    /// Recovers from a failure with the parser returned by `f`, which runs
    /// against the original input, not the partially consumed one.
    /// Fatal errors are passed through
    pub fn flat_map_error<F>(self, f: F) -> Parser<I, O>
    where
        F: Fn(ParseError<I>) -> Parser<I, O> + 'static,
    {
        Parser::new(move |input: I| match self.parse(input.clone()) {
            Ok(res) => Ok(res),
            Err(e) if e.kind.is_fatal() => Err(e),
            Err(e) => f(e).parse(input),
        })
    }

    /// Alternation. When both sides fail the error that got further wins
    pub fn or_else(self, other: Parser<I, O>) -> Parser<I, O> {
        self.flat_map_error(move |left| {
            other.clone().map_error(move |right| left.clone().further(right))
        })
    }

    /// Greedy repetition. Every success is committed, the first failure ends
    /// the loop. Fails only when `allow_empty` is false and nothing matched
    pub fn many(self, allow_empty: bool) -> Parser<I, Vec<O>> {
        Parser::new(move |input: I| {
            let mut out = Vec::new();
            let mut rest = input;
            loop {
                match self.parse(rest.clone()) {
                    Ok((item, next)) => {
                        let progressed = next.remaining() < rest.remaining();
                        out.push(item);
                        rest = next;
                        if !progressed {
                            break;
                        }
                    }
                    Err(e) => {
                        if e.kind.is_fatal() || (out.is_empty() && !allow_empty) {
                            return Err(e);
                        }
                        break;
                    }
                }
            }
            Ok((out, rest))
        })
    }
}

/// Consumes one item when `view` accepts its kind and `predicate` its value
pub fn satisfy<I, O, V, P>(view: V, predicate: P) -> Parser<I, O>
where
    I: Input + 'static,
    O: 'static,
    V: Fn(&I::Item) -> Option<O> + 'static,
    P: Fn(&O) -> bool + 'static,
{
    Parser::new(move |input: I| {
        let (item, rest) = match input.uncons() {
            Some(split) => split,
            None => return Err(ParseError::new(ErrorKind::Exhausted, input)),
        };
        match view(&item) {
            None => Err(ParseError::new(ErrorKind::Mismatch(item), input)),
            Some(out) => {
                if predicate(&out) {
                    Ok((out, rest))
                } else {
                    Err(ParseError::new(ErrorKind::Predicate(item), input))
                }
            }
        }
    })
}

/// Consumes one item of the kind accepted by `view`
pub fn item<I, O, V>(view: V) -> Parser<I, O>
where
    I: Input + 'static,
    O: 'static,
    V: Fn(&I::Item) -> Option<O> + 'static,
{
    satisfy(view, |_| true)
}
