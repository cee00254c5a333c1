//! Sequential token operations.
//!
//! [`Arguments`] owns the token buffer of a single command invocation and
//! offers imperative, one-token-at-a-time access on top of the
//! [applicator](crate::applicator):
//!
//! | Operation            | Token       | Mode        | Consumes             |
//! |----------------------|-------------|-------------|----------------------|
//! | `shift`/`shift_each` | front       | first/all   | always               |
//! | `pop`/`pop_each`     | back        | first/all   | always               |
//! | `peek`/`peek_each`   | by index    | first/all   | never                |
//! | `shift_if`/`shift_each_if` | front | first/all   | only on a match      |
//! | `join`/`join_each`   | all, joined | first/all   | never                |
//!
//! The buffer is never shared: each invocation builds its own `Arguments`
//! from a copy of the raw tokens.

use std::collections::VecDeque;

use crate::applicator::CollectAll;
use crate::descriptor::{Descriptor, FromSlots};
use crate::parser::ValueParser;

/// The owned token buffer of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    tokens: VecDeque<String>,
}

impl Arguments {
    /// Creates a buffer holding `tokens` in order.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over the remaining raw tokens.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Returns the remaining raw tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens.into()
    }

    /// Removes the first token and parses it (first-match).
    ///
    /// The token is consumed whether or not it matched.
    pub fn shift<P: ValueParser>(&mut self, parser: &P) -> Option<P::Output> {
        let token = self.tokens.pop_front()?;
        parser.parse(&token)
    }

    /// Removes the first token and parses it (collect-all).
    pub fn shift_each<C: CollectAll>(&mut self, parsers: &C) -> C::Slots {
        let token = self.tokens.pop_front();
        parsers.collect_all(token.as_deref())
    }

    /// Removes the last token and parses it (first-match).
    pub fn pop<P: ValueParser>(&mut self, parser: &P) -> Option<P::Output> {
        let token = self.tokens.pop_back()?;
        parser.parse(&token)
    }

    /// Removes the last token and parses it (collect-all).
    pub fn pop_each<C: CollectAll>(&mut self, parsers: &C) -> C::Slots {
        let token = self.tokens.pop_back();
        parsers.collect_all(token.as_deref())
    }

    /// Parses the token at `index` without consuming it (first-match).
    pub fn peek<P: ValueParser>(&self, index: usize, parser: &P) -> Option<P::Output> {
        parser.parse(self.tokens.get(index)?)
    }

    /// Parses the token at `index` without consuming it (collect-all).
    pub fn peek_each<C: CollectAll>(&self, index: usize, parsers: &C) -> C::Slots {
        parsers.collect_all(self.tokens.get(index).map(String::as_str))
    }

    /// Parses the first token and removes it only if it matched (first-match).
    pub fn shift_if<P: ValueParser>(&mut self, parser: &P) -> Option<P::Output> {
        let value = parser.parse(self.tokens.front()?)?;
        self.tokens.pop_front();
        Some(value)
    }

    /// Parses the first token and removes it only if any alternative matched
    /// (collect-all).
    pub fn shift_each_if<C: CollectAll>(&mut self, parsers: &C) -> C::Slots {
        let slots = parsers.collect_all(self.tokens.front().map(String::as_str));
        if C::any_filled(&slots) {
            self.tokens.pop_front();
        }
        slots
    }

    /// Joins every remaining token with `separator` and parses the result
    /// (first-match). An empty buffer never matches.
    pub fn join<P: ValueParser>(&self, separator: &str, parser: &P) -> Option<P::Output> {
        parser.parse(&self.joined(separator)?)
    }

    /// Joins every remaining token with `separator` and parses the result
    /// (collect-all).
    pub fn join_each<C: CollectAll>(&self, separator: &str, parsers: &C) -> C::Slots {
        parsers.collect_all(self.joined(separator).as_deref())
    }

    /// Resolves the remaining tokens against `descriptor`, leaving the buffer
    /// untouched.
    pub fn resolve<O: FromSlots>(&self, descriptor: &Descriptor<O>) -> O {
        let tokens: Vec<&str> = self.iter().collect();
        descriptor.compile_with(&tokens)
    }

    fn joined(&self, separator: &str) -> Option<String> {
        if self.tokens.is_empty() {
            return None;
        }
        Some(self.iter().collect::<Vec<_>>().join(separator))
    }
}

impl<S: Into<String>> FromIterator<S> for Arguments {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<String>> for Arguments {
    fn from(tokens: Vec<String>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}
