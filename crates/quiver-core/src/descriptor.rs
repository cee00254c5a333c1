//! Typed resolution descriptors.
//!
//! A [`Descriptor`] is an immutable, reusable schedule of resolution steps
//! plus a default token sequence. Every appended step grows the descriptor's
//! output tuple by one [`Slot`], so the arity is fixed by construction and
//! checked by the type system:
//!
//! ```rust
//! use quiver_core::{Descriptor, Slot, parsers};
//!
//! let descriptor = Descriptor::new()
//!     .required(parsers::from_str::<u32>())
//!     .optional(parsers::literal("quietly"))
//!     .required(parsers::any_token());
//!
//! let (count, quiet, target): (Slot<u32>, Slot<String>, Slot<String>) =
//!     descriptor.compile_with(&["3", "bob"]);
//! assert_eq!(count.into_option(), Some(3));
//! assert!(quiet.is_empty());
//! assert_eq!(target.into_option().as_deref(), Some("bob"));
//! ```
//!
//! Compiling never mutates the descriptor; each call returns freshly
//! allocated slots.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::applicator::Alternatives;
use crate::parser::{ValueParser, ValueParserExt};
use crate::resolver::{Resolution, Step, resolve};
use crate::slot::Slot;

/// A type-erased value flowing through a descriptor's steps.
pub type AnyValue = Box<dyn Any + Send>;

/// An ordered, typed schedule of resolution steps.
///
/// `O` is the output tuple: `()` for an empty descriptor, then
/// `(Slot<A>,)`, `(Slot<A>, Slot<B>)`, and so on, up to twelve slots.
pub struct Descriptor<O = ()> {
    steps: Vec<Step<AnyValue>>,
    defaults: Vec<String>,
    _output: PhantomData<fn() -> O>,
}

impl<O> Clone for Descriptor<O> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            defaults: self.defaults.clone(),
            _output: PhantomData,
        }
    }
}

impl<O> fmt::Debug for Descriptor<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("steps", &self.steps)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl Default for Descriptor<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl Descriptor<()> {
    /// Creates a descriptor with no steps and no default tokens.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            defaults: Vec::new(),
            _output: PhantomData,
        }
    }
}

impl<O> Descriptor<O> {
    /// Captures the token sequence used by [`Descriptor::compile`].
    pub fn with_defaults<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Number of steps, which is also the number of output slots.
    pub fn arity(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[Step<AnyValue>] {
        &self.steps
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// Appends a step that aborts resolution when `parser` does not match.
    pub fn required<P>(self, parser: P) -> Descriptor<<O as Append<P::Output>>::Output>
    where
        P: ValueParser,
        P::Output: Send + 'static,
        O: Append<P::Output>,
    {
        self.push(Step::required(erase_one(parser)))
    }

    /// Appends a step that is skipped, without consuming the token, when
    /// `parser` does not match.
    pub fn optional<P>(self, parser: P) -> Descriptor<<O as Append<P::Output>>::Output>
    where
        P: ValueParser,
        P::Output: Send + 'static,
        O: Append<P::Output>,
    {
        self.push(Step::optional(erase_one(parser)))
    }

    /// Appends a required step with several alternative parsers.
    pub fn required_any<T>(self, parsers: Alternatives<T>) -> Descriptor<<O as Append<T>>::Output>
    where
        T: Send + 'static,
        O: Append<T>,
    {
        self.push(Step::required(erase_all(parsers)))
    }

    /// Appends an optional step with several alternative parsers.
    pub fn optional_any<T>(self, parsers: Alternatives<T>) -> Descriptor<<O as Append<T>>::Output>
    where
        T: Send + 'static,
        O: Append<T>,
    {
        self.push(Step::optional(erase_all(parsers)))
    }

    fn push<N>(self, step: Step<AnyValue>) -> Descriptor<N> {
        let mut steps = self.steps;
        steps.push(step);
        Descriptor {
            steps,
            defaults: self.defaults,
            _output: PhantomData,
        }
    }
}

impl<O: FromSlots> Descriptor<O> {
    /// Resolves the captured default tokens.
    pub fn compile(&self) -> O {
        self.compile_with(&self.defaults)
    }

    /// Resolves `tokens` into a fresh output tuple.
    pub fn compile_with<S: AsRef<str>>(&self, tokens: &[S]) -> O {
        O::from_slots(self.resolve(tokens).slots)
    }

    /// Resolves `tokens`, returning the untyped [`Resolution`] with its
    /// consumption and abort bookkeeping.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Resolution<AnyValue> {
        resolve(tokens, &self.steps)
    }
}

fn box_value<T: Send + 'static>(value: T) -> AnyValue {
    Box::new(value)
}

fn erase_one<P>(parser: P) -> Alternatives<AnyValue>
where
    P: ValueParser,
    P::Output: Send + 'static,
{
    Alternatives::new().or(parser.map(box_value))
}

fn erase_all<T: Send + 'static>(parsers: Alternatives<T>) -> Alternatives<AnyValue> {
    parsers
        .iter()
        .map(|parser| parser.clone().map(box_value).boxed())
        .collect()
}

// ============================================================================
// Output tuples
// ============================================================================

/// Grows an output tuple by one slot of type `T`.
pub trait Append<T> {
    /// The tuple with `Slot<T>` appended.
    type Output;
}

impl<T> Append<T> for () {
    type Output = (Slot<T>,);
}

/// Rebuilds a typed output tuple from erased slots.
pub trait FromSlots: Sized {
    /// Number of slots in the tuple.
    const ARITY: usize;

    /// Converts `slots`, which must be index-aligned with the tuple.
    fn from_slots(slots: Vec<Slot<AnyValue>>) -> Self;
}

impl FromSlots for () {
    const ARITY: usize = 0;

    fn from_slots(_slots: Vec<Slot<AnyValue>>) -> Self {}
}

fn downcast<T: 'static>(slot: Option<Slot<AnyValue>>) -> Slot<T> {
    slot.and_then(Slot::into_option)
        .and_then(|value| value.downcast::<T>().ok())
        .map(|value| *value)
        .into()
}

macro_rules! count {
    () => { 0 };
    ($head:ident $($tail:ident)*) => { 1 + count!($($tail)*) };
}

macro_rules! impl_output_tuple {
    ($($ty:ident),+) => {
        impl<T, $($ty,)+> Append<T> for ($(Slot<$ty>,)+) {
            type Output = ($(Slot<$ty>,)+ Slot<T>,);
        }

        impl<$($ty: 'static,)+> FromSlots for ($(Slot<$ty>,)+) {
            const ARITY: usize = count!($($ty)+);

            fn from_slots(slots: Vec<Slot<AnyValue>>) -> Self {
                let mut slots = slots.into_iter();
                ($(downcast::<$ty>(slots.next()),)+)
            }
        }
    };
}

impl_output_tuple!(T1);
impl_output_tuple!(T1, T2);
impl_output_tuple!(T1, T2, T3);
impl_output_tuple!(T1, T2, T3, T4);
impl_output_tuple!(T1, T2, T3, T4, T5);
impl_output_tuple!(T1, T2, T3, T4, T5, T6);
impl_output_tuple!(T1, T2, T3, T4, T5, T6, T7);
impl_output_tuple!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_output_tuple!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_output_tuple!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_output_tuple!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);

// The twelve-slot tuple is the largest; it can be rebuilt but not extended.
impl<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12> FromSlots
    for (
        Slot<T1>,
        Slot<T2>,
        Slot<T3>,
        Slot<T4>,
        Slot<T5>,
        Slot<T6>,
        Slot<T7>,
        Slot<T8>,
        Slot<T9>,
        Slot<T10>,
        Slot<T11>,
        Slot<T12>,
    )
where
    T1: 'static,
    T2: 'static,
    T3: 'static,
    T4: 'static,
    T5: 'static,
    T6: 'static,
    T7: 'static,
    T8: 'static,
    T9: 'static,
    T10: 'static,
    T11: 'static,
    T12: 'static,
{
    const ARITY: usize = 12;

    fn from_slots(slots: Vec<Slot<AnyValue>>) -> Self {
        let mut slots = slots.into_iter();
        (
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
            downcast(slots.next()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Size {
        Small,
        Large,
    }

    fn size() -> impl ValueParser<Output = Size> {
        parsers::choice([("small", Size::Small), ("large", Size::Large)])
    }

    fn color() -> impl ValueParser<Output = String> {
        parsers::choice([("red", "red".to_string()), ("blue", "blue".to_string())])
    }

    fn schedule() -> Descriptor<(Slot<i32>, Slot<String>, Slot<Size>)> {
        Descriptor::new()
            .required(parsers::from_str::<i32>())
            .optional(color())
            .required(size())
    }

    #[test]
    fn test_arity_grows_per_step() {
        let descriptor = Descriptor::new();
        assert_eq!(descriptor.arity(), 0);
        let descriptor = descriptor.required(parsers::any_token());
        assert_eq!(descriptor.arity(), 1);
        assert_eq!(schedule().arity(), 3);
        assert_eq!(
            <(Slot<i32>, Slot<String>, Slot<Size>) as FromSlots>::ARITY,
            3
        );
    }

    #[test]
    fn test_optional_qualifier_shifts_left() {
        let (amount, color, size) = schedule().compile_with(&["5", "large"]);
        assert_eq!(amount.into_option(), Some(5));
        assert!(color.is_empty());
        assert_eq!(size.into_option(), Some(Size::Large));
    }

    #[test]
    fn test_out_of_tokens_leaves_trailing_slots_empty() {
        let (amount, color, size) = schedule().compile_with(&["5"]);
        assert_eq!(amount.into_option(), Some(5));
        assert!(color.is_empty());
        assert!(size.is_empty());
    }

    #[test]
    fn test_compile_uses_defaults() {
        let descriptor = schedule().with_defaults(["7", "blue", "small"]);
        let (amount, color, size) = descriptor.compile();
        assert_eq!(amount.into_option(), Some(7));
        assert_eq!(color.into_option().as_deref(), Some("blue"));
        assert_eq!(size.into_option(), Some(Size::Small));
        assert_eq!(descriptor.defaults().len(), 3);
    }

    #[test]
    fn test_compilations_are_independent() {
        let descriptor = schedule().with_defaults(["1", "small"]);
        let mut first = descriptor.compile();
        let second = descriptor.compile();
        assert_eq!(first, second);

        first.0.take();
        assert!(first.0.is_empty());
        assert_eq!(descriptor.compile().0.into_option(), Some(1));
    }

    #[test]
    fn test_any_step_tries_alternatives() {
        let descriptor = Descriptor::new().required_any(
            Alternatives::new()
                .or(parsers::from_str::<i64>())
                .or(parsers::literal("all").map(|_| i64::MAX)),
        );
        assert_eq!(descriptor.compile_with(&["all"]).0.into_option(), Some(i64::MAX));
        assert_eq!(descriptor.compile_with(&["3"]).0.into_option(), Some(3));
        assert!(descriptor.compile_with(&["none"]).0.is_empty());
    }

    #[test]
    fn test_resolution_bookkeeping() {
        let resolution = schedule().resolve(&["x"]);
        assert_eq!(resolution.aborted_at, Some(0));
        assert_eq!(resolution.slots.len(), 3);
    }
}
