//! Splitting raw input lines into command invocations.
//!
//! A line is a command when, after leading whitespace, it starts with the
//! configured prefix and has at least one word after it:
//!
//! ```text
//! "/hurt bob 5"  ──▶  Invocation { name: "hurt", tokens: ["bob", "5"] }
//! "hello"        ──▶  None (no prefix)
//! "/   "         ──▶  None (nothing after the prefix)
//! ```
//!
//! Tokens are separated by whitespace. There is no quoting or escaping.

/// The prefix used by [`Tokenizer::default`].
pub const DEFAULT_PREFIX: &str = "/";

/// A command name and its raw argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub tokens: Vec<String>,
}

/// Splits prefixed lines into [`Invocation`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    prefix: String,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Tokenizer {
    /// Creates a tokenizer for lines starting with `prefix`.
    ///
    /// An empty prefix treats every non-blank line as a command.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Splits `line` into a command name and tokens.
    ///
    /// Returns `None` for blank lines, lines without the prefix, and lines
    /// with nothing after the prefix.
    pub fn tokenize(&self, line: &str) -> Option<Invocation> {
        let line = line.trim_start();
        if line.is_empty() {
            return None;
        }

        let rest = line.strip_prefix(self.prefix.as_str())?;
        let mut words = rest.split_whitespace();
        let name = words.next()?.to_string();

        Some(Invocation {
            name,
            tokens: words.map(str::to_string).collect(),
        })
    }
}
