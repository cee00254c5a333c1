//! The token cursor resolver.
//!
//! [`resolve`] consumes an ordered sequence of tokens against an ordered
//! sequence of [`Step`]s. Two cursors advance independently: the step cursor
//! and the token cursor.
//!
//! ```text
//! loop:
//!   step or token cursor out of range   -> stop
//!   a parser of the step matches token  -> fill slot, advance both cursors
//!   no match, step required             -> stop (resolution aborted)
//!   no match, step optional             -> advance the step cursor only
//! ```
//!
//! An optional step that misses leaves its slot empty and re-offers the same
//! token to the next step, so a trailing mandatory argument can shift left
//! past an absent optional qualifier. A required step that misses aborts the
//! rest of the resolution: its slot and every later slot stay empty.
//!
//! There is no error path. Callers inspect which slots are filled.

use tracing::trace;

use crate::applicator::Alternatives;
use crate::slot::Slot;

/// One position of a resolution schedule.
pub struct Step<T> {
    parsers: Alternatives<T>,
    required: bool,
}

impl<T> Clone for Step<T> {
    fn clone(&self) -> Self {
        Self {
            parsers: self.parsers.clone(),
            required: self.required,
        }
    }
}

impl<T> std::fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("parsers", &self.parsers)
            .field("required", &self.required)
            .finish()
    }
}

impl<T: 'static> Step<T> {
    pub fn new(parsers: Alternatives<T>, required: bool) -> Self {
        Self { parsers, required }
    }

    /// A step that aborts resolution when none of its parsers match.
    pub fn required(parsers: Alternatives<T>) -> Self {
        Self::new(parsers, true)
    }

    /// A step that is skipped, without consuming the token, when none of its
    /// parsers match.
    pub fn optional(parsers: Alternatives<T>) -> Self {
        Self::new(parsers, false)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn parsers(&self) -> &Alternatives<T> {
        &self.parsers
    }
}

/// The outcome of one resolution run.
#[derive(Debug)]
pub struct Resolution<T> {
    /// One slot per step, index-aligned with the steps.
    pub slots: Vec<Slot<T>>,
    /// Number of tokens consumed by matching steps.
    pub consumed: usize,
    /// Index of the required step that failed to match, if any.
    pub aborted_at: Option<usize>,
}

impl<T> Resolution<T> {
    /// Returns `true` if a required step stopped the resolution.
    pub fn is_aborted(&self) -> bool {
        self.aborted_at.is_some()
    }
}

/// Resolves `tokens` against `steps`.
///
/// The returned slot count always equals `steps.len()`, whatever the number
/// of tokens.
pub fn resolve<T, S>(tokens: &[S], steps: &[Step<T>]) -> Resolution<T>
where
    T: 'static,
    S: AsRef<str>,
{
    let mut slots: Vec<Slot<T>> = steps.iter().map(|_| Slot::new()).collect();
    let mut step_index = 0;
    let mut token_index = 0;
    let mut aborted_at = None;

    while step_index < steps.len() && token_index < tokens.len() {
        let step = &steps[step_index];
        let token = tokens[token_index].as_ref();

        match step.parsers.first_match(token) {
            Some(value) => {
                slots[step_index].set(value);
                step_index += 1;
                token_index += 1;
            }
            None if step.required => {
                trace!(
                    step = step_index,
                    token = token_index,
                    "Required step did not match, aborting resolution"
                );
                aborted_at = Some(step_index);
                break;
            }
            None => {
                trace!(
                    step = step_index,
                    token = token_index,
                    "Optional step did not match, offering token to next step"
                );
                step_index += 1;
            }
        }
    }

    Resolution {
        slots,
        consumed: token_index,
        aborted_at,
    }
}
