//! Strict JSON document check.
//!
//! A single-pass recursive-descent recognizer over bytes. It never
//! backtracks, so running time is linear in the input length, and nesting
//! deeper than the configured limit stops the scan early.
//!
//! Enforced grammar (RFC 8259):
//!
//! - object keys are quoted strings;
//! - only the escapes `\" \\ \/ \b \f \n \r \t \uXXXX`;
//! - no trailing commas;
//! - exactly one top-level value, surrounded only by whitespace;
//! - numbers without a leading `+` or leading zero, with digits on both
//!   sides of a `.` and a well-formed exponent.

/// Why a document was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JsonShapeError {
    #[error("empty document")]
    Empty,

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { offset: usize, found: char },

    #[error("nesting exceeds {0} levels")]
    TooDeep(usize),

    #[error("trailing characters at offset {0}")]
    Trailing(usize),
}

/// Checks that `input` is one well-formed JSON value.
///
/// ```
/// use warden_validator::predicates::{check_json, JsonShapeError};
///
/// assert!(check_json(r#"{"a": [1, 2.5e3, null]}"#, 128).is_ok());
/// assert_eq!(check_json("[[1]]", 1), Err(JsonShapeError::TooDeep(1)));
/// ```
pub fn check_json(input: &str, max_depth: usize) -> Result<(), JsonShapeError> {
    let mut scanner = Scanner {
        bytes: input.as_bytes(),
        pos: 0,
        max_depth,
    };
    scanner.skip_ws();
    if scanner.at_end() {
        return Err(JsonShapeError::Empty);
    }
    scanner.value(0)?;
    scanner.skip_ws();
    if scanner.at_end() {
        Ok(())
    } else {
        Err(JsonShapeError::Trailing(scanner.pos))
    }
}

/// Boolean form of [`check_json`].
#[must_use]
pub fn is_json(input: &str, max_depth: usize) -> bool {
    check_json(input, max_depth).is_ok()
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl Scanner<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<u8, JsonShapeError> {
        let b = self.peek().ok_or(JsonShapeError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(b)
    }

    fn unexpected(&self, offset: usize) -> JsonShapeError {
        match self.bytes.get(offset) {
            Some(&b) => JsonShapeError::Unexpected {
                offset,
                found: char::from(b),
            },
            None => JsonShapeError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), JsonShapeError> {
        let offset = self.pos;
        if self.next()? == expected {
            Ok(())
        } else {
            Err(self.unexpected(offset))
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn value(&mut self, depth: usize) -> Result<(), JsonShapeError> {
        match self.peek().ok_or(JsonShapeError::UnexpectedEnd)? {
            b'{' => self.object(depth + 1),
            b'[' => self.array(depth + 1),
            b'"' => self.string(),
            b'-' | b'0'..=b'9' => self.number(),
            b't' => self.literal(b"true"),
            b'f' => self.literal(b"false"),
            b'n' => self.literal(b"null"),
            _ => Err(self.unexpected(self.pos)),
        }
    }

    fn enter(&self, depth: usize) -> Result<(), JsonShapeError> {
        if depth > self.max_depth {
            Err(JsonShapeError::TooDeep(self.max_depth))
        } else {
            Ok(())
        }
    }

    fn object(&mut self, depth: usize) -> Result<(), JsonShapeError> {
        self.enter(depth)?;
        self.expect(b'{')?;
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.skip_ws();
            if self.peek() != Some(b'"') {
                return Err(self.unexpected(self.pos));
            }
            self.string()?;
            self.skip_ws();
            self.expect(b':')?;
            self.skip_ws();
            self.value(depth)?;
            self.skip_ws();
            let offset = self.pos;
            match self.next()? {
                b',' => {}
                b'}' => return Ok(()),
                _ => return Err(self.unexpected(offset)),
            }
        }
    }

    fn array(&mut self, depth: usize) -> Result<(), JsonShapeError> {
        self.enter(depth)?;
        self.expect(b'[')?;
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.skip_ws();
            self.value(depth)?;
            self.skip_ws();
            let offset = self.pos;
            match self.next()? {
                b',' => {}
                b']' => return Ok(()),
                _ => return Err(self.unexpected(offset)),
            }
        }
    }

    fn string(&mut self) -> Result<(), JsonShapeError> {
        self.expect(b'"')?;
        loop {
            let offset = self.pos;
            match self.next()? {
                b'"' => return Ok(()),
                b'\\' => {
                    let escape = self.pos;
                    match self.next()? {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {}
                        b'u' => {
                            for _ in 0..4 {
                                let digit = self.pos;
                                if !self.next()?.is_ascii_hexdigit() {
                                    return Err(self.unexpected(digit));
                                }
                            }
                        }
                        _ => return Err(self.unexpected(escape)),
                    }
                }
                b if b < 0x20 => return Err(self.unexpected(offset)),
                _ => {}
            }
        }
    }

    fn digits(&mut self) -> Result<(), JsonShapeError> {
        if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
            return Err(self.unexpected(self.pos));
        }
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        Ok(())
    }

    fn number(&mut self) -> Result<(), JsonShapeError> {
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.digits()?,
            _ => return Err(self.unexpected(self.pos)),
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.digits()?;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            self.digits()?;
        }
        Ok(())
    }

    fn literal(&mut self, word: &[u8]) -> Result<(), JsonShapeError> {
        for &expected in word {
            let offset = self.pos;
            if self.next()? != expected {
                return Err(self.unexpected(offset));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DEPTH: usize = 128;

    #[rstest]
    #[case("null")]
    #[case("true")]
    #[case(" 0 ")]
    #[case("-0.5e+10")]
    #[case("1E3")]
    #[case(r#""esc \" \\ \/ \b \f \n \r \t é""#)]
    #[case(r#"{"a": {"b": [1, 2, {"c": null}]}}"#)]
    #[case("[]")]
    #[case("{}")]
    #[case("\"héllo\"")]
    fn accepts(#[case] input: &str) {
        assert_eq!(check_json(input, DEPTH), Ok(()), "{input}");
    }

    #[rstest]
    #[case("", JsonShapeError::Empty)]
    #[case("   ", JsonShapeError::Empty)]
    #[case("[1, 2,]", JsonShapeError::Unexpected { offset: 6, found: ']' })]
    #[case("{\"a\": 1,}", JsonShapeError::Unexpected { offset: 8, found: '}' })]
    #[case("{a: 1}", JsonShapeError::Unexpected { offset: 1, found: 'a' })]
    #[case("01", JsonShapeError::Trailing(1))]
    #[case("+1", JsonShapeError::Unexpected { offset: 0, found: '+' })]
    #[case(".5", JsonShapeError::Unexpected { offset: 0, found: '.' })]
    #[case("1.", JsonShapeError::UnexpectedEnd)]
    #[case("1e", JsonShapeError::UnexpectedEnd)]
    #[case("1 2", JsonShapeError::Trailing(2))]
    #[case(r#""\x""#, JsonShapeError::Unexpected { offset: 2, found: 'x' })]
    #[case(r#""\u12G4""#, JsonShapeError::Unexpected { offset: 5, found: 'G' })]
    #[case("\"unterminated", JsonShapeError::UnexpectedEnd)]
    #[case("tru", JsonShapeError::UnexpectedEnd)]
    #[case("nul1", JsonShapeError::Unexpected { offset: 3, found: '1' })]
    fn rejects(#[case] input: &str, #[case] expected: JsonShapeError) {
        assert_eq!(check_json(input, DEPTH), Err(expected), "{input}");
    }

    #[test]
    fn control_characters_in_strings_are_rejected() {
        assert!(!is_json("\"a\nb\"", DEPTH));
    }

    #[test]
    fn depth_limit_counts_containers() {
        let nested = |n: usize| format!("{}{}", "[".repeat(n), "]".repeat(n));
        assert!(is_json(&nested(DEPTH), DEPTH));
        assert_eq!(
            check_json(&nested(DEPTH + 1), DEPTH),
            Err(JsonShapeError::TooDeep(DEPTH))
        );
    }

    #[test]
    fn degenerate_nesting_terminates_quickly() {
        let hostile = "[".repeat(1_000_000);
        assert_eq!(check_json(&hostile, DEPTH), Err(JsonShapeError::TooDeep(DEPTH)));
    }
}
