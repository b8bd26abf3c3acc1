//! Directive scanning.
//!
//! Finds `name(argument)` calls with a single left-to-right pass over the
//! immutable source text. The name is matched ASCII case-insensitively.
//!
//! A candidate is rejected (and left untouched) when:
//! - it is preceded by an identifier character (`opal(x)` is not a `pal` call),
//! - the argument is empty (`pal()`),
//! - no closing parenthesis follows on the same line (`pal(unterminated`).
//!
//! A verified call preceded by a backslash is an escaped literal: the backslash
//! offset is reported in [`Scan::escapes`] and no directive is produced.
//! Inside the argument, `\)` stands for a literal `)`.
//!
//! Arguments are stricter than a bare "anything up to `)`" match:
//! - they never span lines, so `pal(a.png` followed by `)` on a later line is
//!   rejected rather than captured across the line break;
//! - surrounding whitespace is trimmed before quote stripping, so
//!   `pal( a.png )` and `pal( 'a.png' )` both yield the locator `a.png`.

use crate::Directive;

/// Function name recognized when none is configured.
pub const DEFAULT_FUNC_NAME: &str = "pal";

/// Result of scanning a document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Scan {
    /// Recognized directives in document order.
    pub directives: Vec<Directive>,
    /// Byte offsets of escape markers to drop from the output.
    pub escapes: Vec<usize>,
}

impl Scan {
    /// True if the document contains neither directives nor escaped calls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.escapes.is_empty()
    }
}

/// Scanner state. Offsets index into the original text.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Looking for the next `name(`.
    Idle,
    /// `name(` found at `start`.
    MatchedName { start: usize },
    /// Call is standalone, `open` is the opening parenthesis.
    AwaitingArgument { start: usize, open: usize },
    /// Argument spans `open + 1..close`.
    ArgumentCaptured {
        start: usize,
        open: usize,
        close: usize,
    },
}

/// Scanner for one directive function name.
#[derive(Debug, Clone)]
pub struct Scanner {
    name: String,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_FUNC_NAME)
    }
}

impl Scanner {
    /// Create a scanner recognizing `name(...)` calls.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Directive function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scan `text` for directives.
    ///
    /// Never fails: malformed calls are skipped and scanning resumes right
    /// after the rejected match.
    #[must_use]
    pub fn scan(&self, text: &str) -> Scan {
        let bytes = text.as_bytes();
        let mut scan = Scan::default();
        let mut cursor = 0;
        let mut state = State::Idle;

        loop {
            state = match state {
                State::Idle => match self.find_call(bytes, cursor) {
                    Some(start) => State::MatchedName { start },
                    None => break,
                },
                State::MatchedName { start } => {
                    if start > 0 && is_identifier_byte(bytes[start - 1]) {
                        cursor = start + 1;
                        State::Idle
                    } else {
                        State::AwaitingArgument {
                            start,
                            open: start + self.name.len(),
                        }
                    }
                }
                State::AwaitingArgument { start, open } => match find_close(bytes, open + 1) {
                    Some(close) => State::ArgumentCaptured { start, open, close },
                    None => {
                        tracing::debug!(offset = start, "Skipping malformed directive");
                        cursor = start + 1;
                        State::Idle
                    }
                },
                State::ArgumentCaptured { start, open, close } => {
                    cursor = close + 1;
                    if start > 0 && bytes[start - 1] == b'\\' {
                        scan.escapes.push(start - 1);
                    } else {
                        scan.directives.push(Directive {
                            raw_statement: text[start..=close].to_owned(),
                            locator: parse_locator(&text[open + 1..close]),
                            span: start..close + 1,
                        });
                    }
                    State::Idle
                }
            };
        }

        scan
    }

    /// Find the next `name(` at or after `from`.
    fn find_call(&self, bytes: &[u8], from: usize) -> Option<usize> {
        let name = self.name.as_bytes();
        let last = bytes.len().checked_sub(name.len() + 1)?;

        (from..=last).find(|&i| {
            bytes[i + name.len()] == b'(' && bytes[i..i + name.len()].eq_ignore_ascii_case(name)
        })
    }
}

/// Find the parenthesis closing an argument that starts at `from`.
///
/// Returns `None` for an empty argument or when a line break comes first.
fn find_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while let Some(&byte) = bytes.get(i) {
        match byte {
            b'\\' if bytes.get(i + 1) == Some(&b')') => i += 2,
            b')' if i > from => return Some(i),
            b')' | b'\n' | b'\r' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Strip one leading and one trailing quote and unescape `\)`.
fn parse_locator(arg: &str) -> String {
    let arg = arg.trim();
    let arg = arg.strip_prefix(is_quote).unwrap_or(arg);
    let arg = arg.strip_suffix(is_quote).unwrap_or(arg);
    arg.replace("\\)", ")")
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}
