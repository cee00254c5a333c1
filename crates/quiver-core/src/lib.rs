//! # Quiver Core
//!
//! The argument resolution engine of the Quiver command framework.
//!
//! This crate turns an ordered sequence of raw string tokens into typed
//! values. It provides:
//!
//! - [`ValueParser`]: the contract every token parser fulfils, plus a small
//!   library of built-in [`parsers`]
//! - [`Slot`]: the single-assignment cell each resolution step reports into
//! - [`Alternatives`] and [`CollectAll`]: first-match and collect-all
//!   application of alternative parsers to one token
//! - [`resolve`]: the token cursor resolver with required/optional steps
//! - [`Descriptor`]: a typed, reusable schedule of steps whose output tuple
//!   grows with each appended step
//! - [`Arguments`]: an owned token buffer with sequential shift/pop/peek/join
//!   operations
//!
//! Resolution never fails: a token that does not fit yields an empty slot,
//! and callers decide what an incomplete result means.
//!
//! ```rust
//! use quiver_core::{Descriptor, parsers};
//!
//! let hurt = Descriptor::new()
//!     .required(parsers::any_token())
//!     .required(parsers::from_str::<u32>());
//!
//! let (target, amount) = hurt.compile_with(&["zombie", "4"]);
//! assert_eq!(target.into_option().as_deref(), Some("zombie"));
//! assert_eq!(amount.into_option(), Some(4));
//! ```

pub mod applicator;
pub mod arguments;
pub mod descriptor;
pub mod parser;
pub mod parsers;
pub mod resolver;
pub mod slot;

pub use applicator::{Alternatives, CollectAll};
pub use arguments::Arguments;
pub use descriptor::{AnyValue, Append, Descriptor, FromSlots};
pub use parser::{BoxedParser, ValueParser, ValueParserExt};
pub use resolver::{Resolution, Step, resolve};
pub use slot::Slot;
