//! The value parser contract.
//!
//! A [`ValueParser`] looks at one token and either produces a typed value or
//! reports "no match" by returning `None`. No-match is never an error: the
//! caller simply moves on to the next alternative.
//!
//! Any `Fn(&str) -> Option<T>` closure is a parser:
//!
//! ```rust
//! use quiver_core::{ValueParser, ValueParserExt};
//!
//! let even = (|token: &str| token.parse::<i64>().ok()).filter(|n| n % 2 == 0);
//! assert_eq!(even.parse("4"), Some(4));
//! assert_eq!(even.parse("3"), None);
//! assert_eq!(even.parse(""), None);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::applicator::Alternatives;

/// Turns a single token into a typed value, or reports that it does not apply.
///
/// Implementations must tolerate empty tokens and return `None` when a token is
/// not applicable. Genuine processing failures are also reported as `None`.
/// The engine assumes, but does not enforce, that parsing is referentially
/// transparent for a given token.
pub trait ValueParser: Send + Sync + 'static {
    /// The type produced on a successful match.
    type Output;

    /// Attempts to parse `token`.
    fn parse(&self, token: &str) -> Option<Self::Output>;
}

impl<F, T> ValueParser for F
where
    F: Fn(&str) -> Option<T> + Send + Sync + 'static,
{
    type Output = T;

    fn parse(&self, token: &str) -> Option<T> {
        self(token)
    }
}

// ============================================================================
// BoxedParser
// ============================================================================

/// A type-erased, cheaply clonable parser.
pub struct BoxedParser<T>(Arc<dyn ValueParser<Output = T>>);

impl<T: 'static> BoxedParser<T> {
    /// Boxes `parser`.
    pub fn new<P>(parser: P) -> Self
    where
        P: ValueParser<Output = T>,
    {
        Self(Arc::new(parser))
    }
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for BoxedParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxedParser")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T: 'static> ValueParser for BoxedParser<T> {
    type Output = T;

    fn parse(&self, token: &str) -> Option<T> {
        self.0.parse(token)
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Combinators available on every [`ValueParser`].
pub trait ValueParserExt: ValueParser + Sized {
    /// Transforms a successful value.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> U + Send + Sync + 'static,
    {
        Map { inner: self, f }
    }

    /// Rejects successful values for which `predicate` returns `false`.
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Output) -> bool + Send + Sync + 'static,
    {
        Filter {
            inner: self,
            predicate,
        }
    }

    /// Starts an ordered list of alternatives: `self` first, then `other`.
    fn or<P>(self, other: P) -> Alternatives<Self::Output>
    where
        P: ValueParser<Output = Self::Output>,
        Self::Output: 'static,
    {
        Alternatives::new().or(self).or(other)
    }

    /// Erases the concrete parser type.
    fn boxed(self) -> BoxedParser<Self::Output>
    where
        Self::Output: 'static,
    {
        BoxedParser::new(self)
    }
}

impl<P: ValueParser> ValueParserExt for P {}

/// Parser returned by [`ValueParserExt::map`].
#[derive(Clone)]
pub struct Map<P, F> {
    inner: P,
    f: F,
}

impl<P, F, U> ValueParser for Map<P, F>
where
    P: ValueParser,
    F: Fn(P::Output) -> U + Send + Sync + 'static,
{
    type Output = U;

    fn parse(&self, token: &str) -> Option<U> {
        self.inner.parse(token).map(&self.f)
    }
}

/// Parser returned by [`ValueParserExt::filter`].
#[derive(Clone)]
pub struct Filter<P, F> {
    inner: P,
    predicate: F,
}

impl<P, F> ValueParser for Filter<P, F>
where
    P: ValueParser,
    F: Fn(&P::Output) -> bool + Send + Sync + 'static,
{
    type Output = P::Output;

    fn parse(&self, token: &str) -> Option<P::Output> {
        self.inner.parse(token).filter(|value| (self.predicate)(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(token: &str) -> Option<i32> {
        token.parse().ok()
    }

    #[test]
    fn test_closure_is_parser() {
        assert_eq!(int.parse("12"), Some(12));
        assert_eq!(int.parse("twelve"), None);
        assert_eq!(int.parse(""), None);
    }

    #[test]
    fn test_map_and_filter() {
        let doubled = int.map(|n| n * 2);
        assert_eq!(doubled.parse("21"), Some(42));

        let positive = int.filter(|n| *n > 0);
        assert_eq!(positive.parse("5"), Some(5));
        assert_eq!(positive.parse("-5"), None);
    }

    #[test]
    fn test_boxed_parser_clone_shares_parser() {
        let boxed = int.boxed();
        let copy = boxed.clone();
        assert_eq!(boxed.parse("7"), copy.parse("7"));
    }
}
