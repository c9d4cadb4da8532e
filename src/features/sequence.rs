//! Restricted decoder for serialized numeric sequences
//!
//! Gold difference cells hold a list literal such as `"[0, 120, -340]"`.
//! Only brackets, commas, whitespace and plain numeric tokens are accepted;
//! anything else is an error. The decoder never evaluates its input.

use thiserror::Error;

/// Reasons a cell fails to decode
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("empty input")]
    Empty,

    #[error("not a sequence: expected '[' at offset {offset}")]
    NotASequence { offset: usize },

    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid number {token:?} at offset {offset}")]
    BadNumber { token: String, offset: usize },

    #[error("nested sequence at offset {offset}")]
    Nested { offset: usize },

    #[error("unterminated sequence")]
    Unterminated,

    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn unexpected(&self) -> DecodeError {
        match self.peek() {
            Some(ch) => DecodeError::UnexpectedChar {
                ch,
                offset: self.pos,
            },
            None => DecodeError::Unterminated,
        }
    }

    /// Numeric token: optional sign, digits with optional fraction, optional exponent
    fn number(&mut self) -> Result<f64, DecodeError> {
        let start = self.pos;

        if matches!(self.peek(), Some('+') | Some('-')) {
            self.bump();
        }

        let mut mantissa_digits = self.digits();
        if self.peek() == Some('.') {
            self.bump();
            mantissa_digits += self.digits();
        }

        let mut valid = mantissa_digits > 0;
        if valid && matches!(self.peek(), Some('e') | Some('E')) {
            self.bump();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
            valid = self.digits() > 0;
        }

        let token = &self.src[start..self.pos];
        let bad = || DecodeError::BadNumber {
            token: token.to_string(),
            offset: start,
        };
        if !valid {
            return Err(bad());
        }
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(bad()),
        }
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.bump();
            count += 1;
        }
        count
    }
}

/// Decode a flat list literal of numbers.
///
/// Accepts an optional trailing comma (`"[1, 2,]"`) like a list literal does.
pub fn decode_sequence(raw: &str) -> Result<Vec<f64>, DecodeError> {
    let mut cur = Cursor::new(raw);
    cur.skip_whitespace();
    if cur.at_end() {
        return Err(DecodeError::Empty);
    }
    if cur.peek() != Some('[') {
        return Err(DecodeError::NotASequence { offset: cur.pos });
    }
    cur.bump();

    let mut values = Vec::new();
    loop {
        cur.skip_whitespace();
        match cur.peek() {
            Some(']') => {
                cur.bump();
                break;
            }
            Some('[') => return Err(DecodeError::Nested { offset: cur.pos }),
            Some(ch) if ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.') => {
                values.push(cur.number()?);
            }
            _ => return Err(cur.unexpected()),
        }

        cur.skip_whitespace();
        match cur.peek() {
            Some(',') => {
                cur.bump();
            }
            Some(']') => {
                cur.bump();
                break;
            }
            _ => return Err(cur.unexpected()),
        }
    }

    cur.skip_whitespace();
    if !cur.at_end() {
        return Err(DecodeError::TrailingInput { offset: cur.pos });
    }
    Ok(values)
}

/// Last sample of an encoded sequence, or None if it does not decode or is empty
pub fn final_value(raw: &str) -> Option<f64> {
    decode_sequence(raw).ok()?.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_basic() {
        assert_eq!(
            decode_sequence("[120, 340, -50]").unwrap(),
            vec![120.0, 340.0, -50.0]
        );
        assert_eq!(decode_sequence("  [ 0 ]  ").unwrap(), vec![0.0]);
        assert_eq!(
            decode_sequence("[1.5, -2e3, +4, .5, 6.]").unwrap(),
            vec![1.5, -2000.0, 4.0, 0.5, 6.0]
        );
    }

    #[test]
    fn test_trailing_comma_allowed() {
        assert_eq!(decode_sequence("[1, 2,]").unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(decode_sequence("[]").unwrap(), Vec::<f64>::new());
        assert_eq!(decode_sequence("[ \t ]").unwrap(), Vec::<f64>::new());
        assert_eq!(final_value("[]"), None);
    }

    #[test]
    fn test_final_value() {
        assert_eq!(final_value("[100,-200,300]"), Some(300.0));
        assert_eq!(final_value("[-7]"), Some(-7.0));
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!(final_value("not a list"), None);
        assert_eq!(final_value("[1,2,"), None);
        assert_eq!(final_value("[1 2]"), None);
        assert_eq!(final_value("[1,,2]"), None);
        assert_eq!(final_value("[,]"), None);
        assert_eq!(final_value("[1, 2]]"), None);
        assert_eq!(final_value("[[1, 2]]"), None);
        assert_eq!(final_value("(1, 2)"), None);
        assert_eq!(final_value("42"), None);
        assert_eq!(final_value(""), None);
        assert_eq!(final_value("[1e999]"), None);
        assert_eq!(final_value("[nan]"), None);
        assert_eq!(final_value("[--5]"), None);
    }

    #[test]
    fn test_rejects_code() {
        assert_eq!(final_value("__import__('os').system('true')"), None);
        assert_eq!(final_value("[1, len('abc')]"), None);
        assert_eq!(final_value("[1] + [2]"), None);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(decode_sequence("   "), Err(DecodeError::Empty));
        assert_eq!(
            decode_sequence("x"),
            Err(DecodeError::NotASequence { offset: 0 })
        );
        assert_eq!(decode_sequence("[1,2,"), Err(DecodeError::Unterminated));
        assert_eq!(
            decode_sequence("[1, a]"),
            Err(DecodeError::UnexpectedChar { ch: 'a', offset: 4 })
        );
        assert_eq!(
            decode_sequence("[1, -]"),
            Err(DecodeError::BadNumber {
                token: "-".to_string(),
                offset: 4
            })
        );
        assert_eq!(decode_sequence("[[1]]"), Err(DecodeError::Nested { offset: 1 }));
        assert_eq!(
            decode_sequence("[1] x"),
            Err(DecodeError::TrailingInput { offset: 4 })
        );
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert_eq!(final_value("[1, é]"), None);
        assert_eq!(final_value("[１]"), None);
    }

    proptest! {
        #[test]
        fn prop_final_value_is_last_element(values in prop::collection::vec(-100_000i64..100_000, 1..40)) {
            let raw = format!(
                "[{}]",
                values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
            );
            let expected = *values.last().unwrap() as f64;
            prop_assert_eq!(final_value(&raw), Some(expected));
        }

        #[test]
        fn prop_decodes_float_lists(values in prop::collection::vec(-1.0e6f64..1.0e6, 0..20)) {
            let raw = format!(
                "[{}]",
                values.iter().map(|v| format!("{:?}", v)).collect::<Vec<_>>().join(",")
            );
            prop_assert_eq!(decode_sequence(&raw).unwrap(), values);
        }

        #[test]
        fn prop_arbitrary_text_never_panics(raw in ".*") {
            let _ = final_value(&raw);
        }
    }
}
