//! Grammar acceptance check for json text.
//!
//! Nothing is built: every `meet_*` production looks at the input from a
//! start offset and answers with the number of bytes it consumed, or `None`
//! when the production does not match there. A `None` anywhere short-circuits
//! the caller. All productions share one borrowed input and move a plain
//! index forward, so no substrings are ever created.
//!
//! Containers nested deeper than [`MAX_DEPTH`] are rejected, which bounds
//! the recursion for hostile input.

/// Deepest accepted nesting of objects and arrays.
pub const MAX_DEPTH: usize = 512;

/// Returns true if the whole of `text` is a json object or a json array.
pub fn is_valid_json(text: &str) -> bool {
    let scanner = Scanner::new(text);
    let len = text.len();
    scanner.meet_object(0, 0) == Some(len) || scanner.meet_array(0, 0) == Some(len)
}

struct Scanner<'a> {
    input: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Sign,
    LeadingDigit,
    IntegerDigits,
    AfterInteger,
    FractionFirstDigit,
    FractionDigits,
    ExponentMark,
    ExponentSign,
    ExponentFirstDigit,
    ExponentDigits,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Scanner {
            input: text.as_bytes(),
        }
    }

    fn at(&self, pos: usize) -> Option<u8> {
        self.input.get(pos).copied()
    }

    fn starts_with_at(&self, pos: usize, literal: &[u8]) -> bool {
        self.input
            .get(pos..)
            .map(|rest| rest.starts_with(literal))
            .unwrap_or(false)
    }

    fn meet_object(&self, start: usize, depth: usize) -> Option<usize> {
        self.meet_container(start, depth, b'{', b'}', true)
    }

    fn meet_array(&self, start: usize, depth: usize) -> Option<usize> {
        self.meet_container(start, depth, b'[', b']', false)
    }

    /// Shared body of the object and array productions. `keyed` selects the
    /// object member form `ws string ws ':' value` over the bare array `value`.
    /// `depth` counts the containers already open around this one.
    fn meet_container(&self, start: usize, depth: usize, open: u8, close: u8, keyed: bool) -> Option<usize> {
        if self.at(start)? != open || depth >= MAX_DEPTH {
            return None;
        }
        let mut index = start + 1;

        let after_open = index + self.meet_whitespace(index);
        if self.at(after_open)? == close {
            return Some(after_open + 1 - start);
        }

        loop {
            if keyed {
                index += self.meet_whitespace(index);
                index += self.meet_string(index)?;
                index += self.meet_whitespace(index);
                if self.at(index)? != b':' {
                    return None;
                }
                index += 1;
            }
            index += self.meet_value(index, depth + 1)?;
            match self.at(index)? {
                c if c == close => return Some(index + 1 - start),
                b',' => index += 1,
                _ => return None,
            }
        }
    }

    fn meet_value(&self, start: usize, depth: usize) -> Option<usize> {
        self.at(start)?;
        let mut index = start + self.meet_whitespace(start);

        if self.starts_with_at(index, b"null") || self.starts_with_at(index, b"true") {
            index += 4;
        } else if self.starts_with_at(index, b"false") {
            index += 5;
        } else if let Some(n) = self
            .meet_string(index)
            .or_else(|| self.meet_number(index))
            .or_else(|| self.meet_object(index, depth))
            .or_else(|| self.meet_array(index, depth))
        {
            index += n;
        } else {
            return None;
        }

        index += self.meet_whitespace(index);
        Some(index - start)
    }

    fn meet_string(&self, start: usize) -> Option<usize> {
        if self.at(start)? != b'"' {
            return None;
        }
        let mut escaped = false;
        let mut index = start + 1;
        while let Some(c) = self.at(index) {
            match c {
                b'\\' => escaped = !escaped,
                b'"' if !escaped => return Some(index + 1 - start),
                _ => escaped = false,
            }
            index += 1;
        }
        None
    }

    fn meet_number(&self, start: usize) -> Option<usize> {
        use NumberState::*;

        let mut index = start;
        let mut state = Sign;
        loop {
            let current = self.at(index);
            let digit = current.map_or(false, |c| c.is_ascii_digit());
            state = match state {
                Sign => {
                    if current == Some(b'-') {
                        index += 1;
                    }
                    LeadingDigit
                }
                LeadingDigit => match current {
                    Some(b'0') => {
                        index += 1;
                        AfterInteger
                    }
                    Some(b'1'..=b'9') => {
                        index += 1;
                        IntegerDigits
                    }
                    _ => return None,
                },
                IntegerDigits if digit => {
                    index += 1;
                    IntegerDigits
                }
                IntegerDigits => AfterInteger,
                AfterInteger => {
                    if current == Some(b'.') {
                        index += 1;
                        FractionFirstDigit
                    } else {
                        ExponentMark
                    }
                }
                FractionFirstDigit if digit => {
                    index += 1;
                    FractionDigits
                }
                FractionFirstDigit => return None,
                FractionDigits if digit => {
                    index += 1;
                    FractionDigits
                }
                FractionDigits => ExponentMark,
                ExponentMark => match current {
                    Some(b'e' | b'E') => {
                        index += 1;
                        ExponentSign
                    }
                    _ => return Some(index - start),
                },
                ExponentSign => {
                    if matches!(current, Some(b'+' | b'-')) {
                        index += 1;
                    }
                    ExponentFirstDigit
                }
                ExponentFirstDigit if digit => {
                    index += 1;
                    ExponentDigits
                }
                ExponentFirstDigit => return None,
                ExponentDigits if digit => {
                    index += 1;
                    ExponentDigits
                }
                ExponentDigits => return Some(index - start),
            };
        }
    }

    /// Zero or more whitespace bytes; never fails.
    fn meet_whitespace(&self, start: usize) -> usize {
        self.input
            .get(start..)
            .map(|rest| {
                rest.iter()
                    .take_while(|&&c| matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c))
                    .count()
            })
            .unwrap_or(0)
    }
}
