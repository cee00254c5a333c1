//! Built-in value parsers.

use std::fmt;
use std::marker::PhantomData;
use std::ops::RangeBounds;
use std::str::FromStr;

use crate::parser::ValueParser;

/// Parses any [`FromStr`] type. Empty tokens and parse errors do not match.
pub struct FromStrParser<T>(PhantomData<fn() -> T>);

impl<T> Clone for FromStrParser<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FromStrParser<T> {}

impl<T> fmt::Debug for FromStrParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FromStrParser")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T: FromStr + 'static> ValueParser for FromStrParser<T> {
    type Output = T;

    fn parse(&self, token: &str) -> Option<T> {
        if token.is_empty() {
            return None;
        }
        token.parse().ok()
    }
}

pub fn from_str<T: FromStr + 'static>() -> FromStrParser<T> {
    FromStrParser(PhantomData)
}

/// Matches one keyword, ignoring ASCII case, and yields its canonical spelling.
#[derive(Debug, Clone)]
pub struct Literal {
    word: String,
}

impl ValueParser for Literal {
    type Output = String;

    fn parse(&self, token: &str) -> Option<String> {
        token
            .eq_ignore_ascii_case(&self.word)
            .then(|| self.word.clone())
    }
}

pub fn literal(word: impl Into<String>) -> Literal {
    Literal { word: word.into() }
}

/// Maps keywords, ignoring ASCII case, to values.
#[derive(Debug, Clone)]
pub struct Choice<T> {
    entries: Vec<(String, T)>,
}

impl<T: Clone + Send + Sync + 'static> ValueParser for Choice<T> {
    type Output = T;

    fn parse(&self, token: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, value)| value.clone())
    }
}

pub fn choice<I, S, T>(entries: I) -> Choice<T>
where
    I: IntoIterator<Item = (S, T)>,
    S: Into<String>,
{
    Choice {
        entries: entries
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect(),
    }
}

/// Rejects values of the inner parser that fall outside a range.
#[derive(Debug, Clone)]
pub struct Bounded<P, R> {
    inner: P,
    range: R,
}

impl<P, R> ValueParser for Bounded<P, R>
where
    P: ValueParser,
    P::Output: PartialOrd,
    R: RangeBounds<P::Output> + Send + Sync + 'static,
{
    type Output = P::Output;

    fn parse(&self, token: &str) -> Option<P::Output> {
        self.inner
            .parse(token)
            .filter(|value| self.range.contains(value))
    }
}

pub fn bounded<P, R>(inner: P, range: R) -> Bounded<P, R>
where
    P: ValueParser,
    P::Output: PartialOrd,
    R: RangeBounds<P::Output> + Send + Sync + 'static,
{
    Bounded { inner, range }
}

/// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, ignoring ASCII case.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl ValueParser for Boolean {
    type Output = bool;

    fn parse(&self, token: &str) -> Option<bool> {
        const TRUTHY: [&str; 4] = ["true", "yes", "on", "1"];
        const FALSY: [&str; 4] = ["false", "no", "off", "0"];

        if TRUTHY.iter().any(|word| word.eq_ignore_ascii_case(token)) {
            Some(true)
        } else if FALSY.iter().any(|word| word.eq_ignore_ascii_case(token)) {
            Some(false)
        } else {
            None
        }
    }
}

pub fn boolean() -> Boolean {
    Boolean
}

/// Accepts any non-empty token verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyToken;

impl ValueParser for AnyToken {
    type Output = String;

    fn parse(&self, token: &str) -> Option<String> {
        (!token.is_empty()).then(|| token.to_string())
    }
}

pub fn any_token() -> AnyToken {
    AnyToken
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(from_str::<u8>().parse("200"), Some(200));
        assert_eq!(from_str::<u8>().parse("300"), None);
        assert_eq!(from_str::<f64>().parse("1.5"), Some(1.5));
        assert_eq!(from_str::<String>().parse(""), None);
    }

    #[test]
    fn test_literal_ignores_case() {
        let parser = literal("All");
        assert_eq!(parser.parse("ALL").as_deref(), Some("All"));
        assert_eq!(parser.parse("al"), None);
    }

    #[test]
    fn test_choice() {
        let parser = choice([("fire", 1), ("ice", 2)]);
        assert_eq!(parser.parse("Ice"), Some(2));
        assert_eq!(parser.parse("earth"), None);
        assert_eq!(parser.parse(""), None);
    }

    #[test]
    fn test_bounded() {
        let parser = bounded(from_str::<i32>(), 1..=20);
        assert_eq!(parser.parse("20"), Some(20));
        assert_eq!(parser.parse("21"), None);
        assert_eq!(parser.parse("0"), None);
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean().parse("Yes"), Some(true));
        assert_eq!(boolean().parse("off"), Some(false));
        assert_eq!(boolean().parse("maybe"), None);
    }

    #[test]
    fn test_any_token() {
        assert_eq!(any_token().parse("x").as_deref(), Some("x"));
        assert_eq!(any_token().parse(""), None);
    }
}
