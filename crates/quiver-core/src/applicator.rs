//! Multi-parser application.
//!
//! Given one token and an ordered list of alternative parsers, the applicator
//! works in one of two modes:
//!
//! - **first-match**: return the first parser's value that is not `None`
//!   ([`Alternatives::first_match`]);
//! - **collect-all**: return one [`Slot`] per parser, filling at most the slot
//!   of the first parser that matched ([`CollectAll::collect_all`]).
//!
//! In both modes later parsers are never attempted once one has matched.
//!
//! Alternatives with different output types are expressed either by mapping
//! each into a shared enum, or by applying a tuple of parsers in collect-all
//! mode, which reports which alternative matched:
//!
//! ```rust
//! use quiver_core::{CollectAll, parsers};
//!
//! let (number, word) = (parsers::from_str::<u32>(), parsers::any_token())
//!     .collect_all(Some("seven"));
//! assert!(number.is_empty());
//! assert_eq!(word.get().map(String::as_str), Some("seven"));
//! ```

use std::fmt;

use crate::parser::{BoxedParser, ValueParser};
use crate::slot::Slot;

/// An ordered list of alternative parsers sharing one output type.
///
/// `Alternatives` is itself a [`ValueParser`] working in first-match mode.
pub struct Alternatives<T> {
    parsers: Vec<BoxedParser<T>>,
}

impl<T> Clone for Alternatives<T> {
    fn clone(&self) -> Self {
        Self {
            parsers: self.parsers.clone(),
        }
    }
}

impl<T> Default for Alternatives<T> {
    fn default() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Alternatives<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alternatives")
            .field("len", &self.parsers.len())
            .finish()
    }
}

impl<T: 'static> Alternatives<T> {
    /// Creates an empty list of alternatives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `parser` as the lowest-priority alternative.
    pub fn or<P>(mut self, parser: P) -> Self
    where
        P: ValueParser<Output = T>,
    {
        self.push(parser);
        self
    }

    pub fn push<P>(&mut self, parser: P)
    where
        P: ValueParser<Output = T>,
    {
        self.parsers.push(BoxedParser::new(parser));
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoxedParser<T>> {
        self.parsers.iter()
    }

    /// Returns the value of the first parser that matches `token`.
    ///
    /// An empty list never matches.
    pub fn first_match(&self, token: &str) -> Option<T> {
        self.parsers.iter().find_map(|parser| parser.parse(token))
    }

    /// Returns one slot per parser, filling only the first match.
    ///
    /// An absent `token` yields all-empty slots without invoking any parser.
    pub fn collect_all(&self, token: Option<&str>) -> Vec<Slot<T>> {
        let mut slots: Vec<Slot<T>> = self.parsers.iter().map(|_| Slot::new()).collect();
        let Some(token) = token else {
            return slots;
        };

        for (slot, parser) in slots.iter_mut().zip(&self.parsers) {
            if let Some(value) = parser.parse(token) {
                slot.set(value);
                break;
            }
        }

        slots
    }
}

impl<T: 'static> ValueParser for Alternatives<T> {
    type Output = T;

    fn parse(&self, token: &str) -> Option<T> {
        self.first_match(token)
    }
}

impl<T: 'static> FromIterator<BoxedParser<T>> for Alternatives<T> {
    fn from_iter<I: IntoIterator<Item = BoxedParser<T>>>(iter: I) -> Self {
        Self {
            parsers: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// CollectAll
// ============================================================================

/// A set of alternatives that can be applied in collect-all mode.
///
/// Implemented for [`Alternatives<T>`] and for tuples of up to eight
/// [`ValueParser`]s with independent output types.
pub trait CollectAll {
    /// One slot per alternative, index-aligned with the alternatives.
    type Slots;

    /// Applies the alternatives to `token`, stopping at the first match.
    fn collect_all(&self, token: Option<&str>) -> Self::Slots;

    /// Returns `true` if any slot was filled.
    fn any_filled(slots: &Self::Slots) -> bool;
}

impl<T: 'static> CollectAll for Alternatives<T> {
    type Slots = Vec<Slot<T>>;

    fn collect_all(&self, token: Option<&str>) -> Vec<Slot<T>> {
        Alternatives::collect_all(self, token)
    }

    fn any_filled(slots: &Vec<Slot<T>>) -> bool {
        slots.iter().any(Slot::is_filled)
    }
}

macro_rules! impl_collect_all {
    ($($parser:ident : $idx:tt),+) => {
        impl<$($parser: ValueParser,)+> CollectAll for ($($parser,)+) {
            type Slots = ($(Slot<<$parser as ValueParser>::Output>,)+);

            #[allow(unused_mut)]
            fn collect_all(&self, token: Option<&str>) -> Self::Slots {
                let mut slots = ($(Slot::<<$parser as ValueParser>::Output>::new(),)+);
                let Some(token) = token else {
                    return slots;
                };

                $(
                    if let Some(value) = self.$idx.parse(token) {
                        slots.$idx.set(value);
                        return slots;
                    }
                )+

                slots
            }

            fn any_filled(slots: &Self::Slots) -> bool {
                false $(|| slots.$idx.is_filled())+
            }
        }
    };
}

impl_collect_all!(P1: 0);
impl_collect_all!(P1: 0, P2: 1);
impl_collect_all!(P1: 0, P2: 1, P3: 2);
impl_collect_all!(P1: 0, P2: 1, P3: 2, P4: 3);
impl_collect_all!(P1: 0, P2: 1, P3: 2, P4: 3, P5: 4);
impl_collect_all!(P1: 0, P2: 1, P3: 2, P4: 3, P5: 4, P6: 5);
impl_collect_all!(P1: 0, P2: 1, P3: 2, P4: 3, P5: 4, P6: 5, P7: 6);
impl_collect_all!(P1: 0, P2: 1, P3: 2, P4: 3, P5: 4, P6: 5, P7: 6, P8: 7);
