//! Text encoding for the persisted attendance file.
//!
//! The format is a restricted object literal: one object whose keys are roll
//! numbers and whose values are arrays of quoted date strings.
//!
//! ```text
//! {"101":["2025-07-01","2025-07-02"],"102":["2025-07-01"]}
//! ```
//!
//! # Grammar
//!
//! ```text
//! object := ws '{' ws ( pair ( ws ',' ws pair )* )? ws '}' ws
//! pair   := key ws ':' ws array
//! key    := string | bare-integer        (content must parse as an integer)
//! array  := '[' ws ( string ( ws ',' ws string )* )? ws ']'
//! string := '"' ( char | '\"' | '\\' | '\n' | '\r' | '\t' )* '"'
//! ```
//!
//! This is not general JSON: nested objects, numbers as values, booleans and
//! nulls are all rejected. Decoding is all-or-nothing; any error discards the
//! partially built store.

use crate::error::CodecError;
use crate::store::{Store, StudentId};

/// Decodes persisted text into a store.
///
/// Returns `Ok(None)` when the text is empty or whitespace only, meaning
/// there is no data to load. Dates for each student are appended in file
/// order and then sorted; duplicates present in the text are kept.
///
/// # Errors
///
/// Returns a [`CodecError`] with the byte position of the first problem if
/// the text does not match the grammar or a key is not an integer.
///
/// # Examples
///
/// ```rust
/// use attendance::codec::decode;
/// use attendance::store::StudentId;
///
/// let store = decode(r#"{"101":["2025-07-02","2025-07-01"]}"#)?.unwrap();
/// assert_eq!(store.view(StudentId(101))?, ["2025-07-01", "2025-07-02"]);
///
/// assert!(decode("")?.is_none());
/// assert!(decode("{invalid").is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode(text: &str) -> Result<Option<Store>, CodecError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    Parser::new(text).document().map(Some)
}

/// Encodes a store as persisted text.
///
/// Students appear in ascending id order so repeated encodes of the same
/// store are byte-identical.
///
/// # Examples
///
/// ```rust
/// use attendance::codec::encode;
/// use attendance::store::{Store, StudentId};
///
/// let mut store = Store::new();
/// store.mark(StudentId(102), "2025-07-01")?;
/// store.mark(StudentId(101), "2025-07-01")?;
///
/// assert_eq!(encode(&store), r#"{"101":["2025-07-01"],"102":["2025-07-01"]}"#);
/// # Ok::<(), attendance::error::RecordError>(())
/// ```
pub fn encode(store: &Store) -> String {
    let mut out = String::from("{");

    for (i, (roll_no, dates)) in store.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&roll_no.to_string());
        out.push_str("\":[");
        for (j, date) in dates.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            out.push('"');
            escape_into(&mut out, date);
            out.push('"');
        }
        out.push(']');
    }

    out.push('}');
    out
}

/// Appends `s` to `out` with quotes, backslashes and the three common
/// control characters escaped.
fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
}

/// Cursor over the input text. Positions are byte offsets.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, expected: &'static str) -> CodecError {
        match self.peek() {
            Some(found) => CodecError::UnexpectedChar {
                found,
                position: self.pos,
                expected,
            },
            None => CodecError::UnexpectedEnd {
                position: self.pos,
                expected,
            },
        }
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<(), CodecError> {
        if self.peek() == Some(wanted) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Parses the whole input as one object followed only by whitespace.
    fn document(mut self) -> Result<Store, CodecError> {
        self.skip_whitespace();
        let store = self.object()?;
        self.skip_whitespace();

        if self.pos < self.input.len() {
            return Err(CodecError::TrailingCharacters { position: self.pos });
        }
        Ok(store)
    }

    fn object(&mut self) -> Result<Store, CodecError> {
        let mut store = Store::new();

        self.expect('{', "'{'")?;
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(store);
        }

        loop {
            let (roll_no, dates) = self.pair()?;
            store.insert_loaded(roll_no, dates);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_whitespace();
                }
                Some('}') => {
                    self.bump();
                    return Ok(store);
                }
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }
    }

    fn pair(&mut self) -> Result<(StudentId, Vec<String>), CodecError> {
        let roll_no = self.key()?;
        self.skip_whitespace();
        self.expect(':', "':'")?;
        self.skip_whitespace();
        let dates = self.array()?;
        Ok((roll_no, dates))
    }

    /// Parses a roll number key, quoted or bare.
    fn key(&mut self) -> Result<StudentId, CodecError> {
        let start = self.pos;

        let key = if self.peek() == Some('"') {
            self.string()?
        } else {
            while self
                .peek()
                .is_some_and(|c| !c.is_whitespace() && !matches!(c, ':' | ',' | '{' | '}' | '[' | ']'))
            {
                self.bump();
            }
            if self.pos == start {
                return Err(self.unexpected("roll number"));
            }
            self.input[start..self.pos].to_string()
        };

        key.parse().map_err(|_| CodecError::InvalidRollNo {
            key,
            position: start,
        })
    }

    fn array(&mut self) -> Result<Vec<String>, CodecError> {
        let mut dates = Vec::new();

        self.expect('[', "'['")?;
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(dates);
        }

        loop {
            dates.push(self.string()?);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_whitespace();
                }
                Some(']') => {
                    self.bump();
                    return Ok(dates);
                }
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
    }

    fn string(&mut self) -> Result<String, CodecError> {
        self.expect('"', "'\"'")?;

        let mut value = String::new();
        loop {
            let escape_at = self.pos;
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => {
                    let unescaped = match self.bump() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some(found) => {
                            return Err(CodecError::InvalidEscape {
                                found,
                                position: escape_at,
                            });
                        }
                        None => return Err(self.unexpected("escape character")),
                    };
                    value.push(unescaped);
                }
                Some(c) => value.push(c),
                None => return Err(self.unexpected("closing '\"'")),
            }
        }
    }
}
