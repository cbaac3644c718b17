//! Structured token streams over JSON-like text.
//!
//! [`JsonReader`] is a pull reader: callers [`TokenReader::peek`] the next [`TokenKind`] and then
//! consume exactly that token. Beyond strict JSON it accepts `//` and `/* */` comments,
//! single-quoted strings, unquoted identifier keys and trailing commas.

use serde_json::{
    Number,
    ser::{CompactFormatter, Formatter, PrettyFormatter},
};

use crate::foundation::error::{DocumentError, DocumentResult};

/// Kind of the next token in a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    String,
    Number,
    Boolean,
    Null,
    EndDocument,
}

/// Source of structured tokens.
pub trait TokenReader {
    /// Kind of the next token, without consuming it.
    fn peek(&mut self) -> DocumentResult<TokenKind>;

    /// False when the current object or array (or the document) has no more entries.
    fn has_next(&mut self) -> DocumentResult<bool> {
        Ok(!matches!(
            self.peek()?,
            TokenKind::EndObject | TokenKind::EndArray | TokenKind::EndDocument
        ))
    }

    fn begin_object(&mut self) -> DocumentResult<()>;
    fn end_object(&mut self) -> DocumentResult<()>;
    fn begin_array(&mut self) -> DocumentResult<()>;
    fn end_array(&mut self) -> DocumentResult<()>;
    fn next_name(&mut self) -> DocumentResult<String>;
    fn next_string(&mut self) -> DocumentResult<String>;
    fn next_number(&mut self) -> DocumentResult<Number>;
    fn next_bool(&mut self) -> DocumentResult<bool>;
    fn next_null(&mut self) -> DocumentResult<()>;

    /// Position used in error messages.
    fn offset(&self) -> usize;
}

/// Sink of structured tokens.
pub trait TokenWriter {
    fn begin_object(&mut self) -> DocumentResult<()>;
    fn end_object(&mut self) -> DocumentResult<()>;
    fn begin_array(&mut self) -> DocumentResult<()>;
    fn end_array(&mut self) -> DocumentResult<()>;
    fn name(&mut self, name: &str) -> DocumentResult<()>;
    fn string(&mut self, value: &str) -> DocumentResult<()>;
    fn number(&mut self, value: &Number) -> DocumentResult<()>;
    fn bool(&mut self, value: bool) -> DocumentResult<()>;
    fn null(&mut self) -> DocumentResult<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ObjectState {
    Start,
    AfterName,
    AfterValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReadScope {
    Document { done: bool },
    Object(ObjectState),
    Array { first: bool },
}

/// Pull reader over JSON-like text.
#[derive(Debug)]
pub struct JsonReader<'a> {
    input: &'a str,
    pos: usize,
    stack: Vec<ReadScope>,
    peeked: Option<TokenKind>,
}

impl<'a> JsonReader<'a> {
    pub fn new(input: &'a str) -> Self {
        let pos = if input.starts_with('\u{feff}') { 3 } else { 0 };
        Self {
            input,
            pos,
            stack: vec![ReadScope::Document { done: false }],
            peeked: None,
        }
    }

    fn err(&self, message: impl Into<String>) -> DocumentError {
        DocumentError::parse(self.pos, message)
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn skip_insignificant(&mut self) -> DocumentResult<()> {
        let bytes = self.bytes();
        loop {
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if bytes[self.pos..].starts_with(b"//") {
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            if bytes[self.pos..].starts_with(b"/*") {
                let Some(end) = self.input[self.pos + 2..].find("*/") else {
                    return Err(self.err("unterminated block comment"));
                };
                self.pos += 2 + end + 2;
                continue;
            }
            return Ok(());
        }
    }

    fn peek_byte(&mut self) -> DocumentResult<Option<u8>> {
        self.skip_insignificant()?;
        Ok(self.bytes().get(self.pos).copied())
    }

    fn scan_ident(&self) -> &'a str {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut end = self.pos;
        while end < bytes.len() && is_ident_byte(bytes[end]) {
            end += 1;
        }
        &input[self.pos..end]
    }

    fn unexpected_here(&self) -> DocumentError {
        match self.input[self.pos..].chars().next() {
            Some(c) => self.err(format!("unexpected character '{c}'")),
            None => self.err("unexpected end of input"),
        }
    }

    fn value_kind(&mut self) -> DocumentResult<TokenKind> {
        match self.peek_byte()? {
            Some(b'{') => Ok(TokenKind::BeginObject),
            Some(b'[') => Ok(TokenKind::BeginArray),
            Some(b'"' | b'\'') => Ok(TokenKind::String),
            Some(b'-' | b'0'..=b'9') => Ok(TokenKind::Number),
            Some(c) if is_ident_start(c) => match self.scan_ident() {
                "true" | "false" => Ok(TokenKind::Boolean),
                "null" => Ok(TokenKind::Null),
                other => Err(self.err(format!("unexpected identifier '{other}'"))),
            },
            _ => Err(self.unexpected_here()),
        }
    }

    fn name_or_end(&mut self) -> DocumentResult<TokenKind> {
        match self.peek_byte()? {
            Some(b'}') => Ok(TokenKind::EndObject),
            Some(b'"' | b'\'') => Ok(TokenKind::Name),
            Some(c) if is_ident_start(c) => Ok(TokenKind::Name),
            _ => Err(self.err("expected a member name or '}'")),
        }
    }

    fn compute_peek(&mut self) -> DocumentResult<TokenKind> {
        let Some(top) = self.stack.last().copied() else {
            return Err(self.err("reader used after the end of the document"));
        };
        match top {
            ReadScope::Document { done: false } => self.value_kind(),
            ReadScope::Document { done: true } => match self.peek_byte()? {
                None => Ok(TokenKind::EndDocument),
                Some(_) => Err(self.err("trailing content after document")),
            },
            ReadScope::Object(ObjectState::Start) => self.name_or_end(),
            ReadScope::Object(ObjectState::AfterName) => self.value_kind(),
            ReadScope::Object(ObjectState::AfterValue) => match self.peek_byte()? {
                Some(b',') => {
                    self.pos += 1;
                    self.name_or_end()
                }
                Some(b'}') => Ok(TokenKind::EndObject),
                _ => Err(self.err("expected ',' or '}'")),
            },
            ReadScope::Array { first: true } => match self.peek_byte()? {
                Some(b']') => Ok(TokenKind::EndArray),
                _ => self.value_kind(),
            },
            ReadScope::Array { first: false } => match self.peek_byte()? {
                Some(b',') => {
                    self.pos += 1;
                    match self.peek_byte()? {
                        Some(b']') => Ok(TokenKind::EndArray),
                        _ => self.value_kind(),
                    }
                }
                Some(b']') => Ok(TokenKind::EndArray),
                _ => Err(self.err("expected ',' or ']'")),
            },
        }
    }

    fn expect(&mut self, expected: TokenKind) -> DocumentResult<()> {
        let found = self.peek()?;
        if found != expected {
            return Err(self.err(format!("expected {expected:?} but found {found:?}")));
        }
        self.peeked = None;
        Ok(())
    }

    fn mark_value(&mut self) {
        match self.stack.last_mut() {
            Some(ReadScope::Document { done }) => *done = true,
            Some(ReadScope::Object(state)) => *state = ObjectState::AfterValue,
            Some(ReadScope::Array { first }) => *first = false,
            None => {}
        }
    }

    fn read_ident(&mut self) -> &'a str {
        let ident = self.scan_ident();
        self.pos += ident.len();
        ident
    }

    fn read_string(&mut self) -> DocumentResult<String> {
        let bytes = self.bytes();
        let quote = bytes[self.pos];
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();

        loop {
            let Some(&b) = bytes.get(self.pos) else {
                self.pos = start;
                return Err(self.err("unterminated string"));
            };
            if b == quote {
                self.pos += 1;
                return Ok(out);
            }
            if b == b'\\' {
                self.pos += 1;
                self.read_escape(&mut out)?;
                continue;
            }
            // Copy the run up to the next quote or escape in one go.
            let run_end = bytes[self.pos..]
                .iter()
                .position(|&c| c == quote || c == b'\\')
                .map_or(bytes.len(), |i| self.pos + i);
            out.push_str(&self.input[self.pos..run_end]);
            self.pos = run_end;
        }
    }

    fn read_escape(&mut self, out: &mut String) -> DocumentResult<()> {
        let Some(&c) = self.bytes().get(self.pos) else {
            return Err(self.err("unterminated escape"));
        };
        self.pos += 1;
        match c {
            b'"' => out.push('"'),
            b'\'' => out.push('\''),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{08}'),
            b'f' => out.push('\u{0c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            // Line continuation.
            b'\n' => {}
            b'u' => {
                let first = self.read_hex4()?;
                let ch = if (0xD800..0xDC00).contains(&first) {
                    if !self.bytes()[self.pos..].starts_with(b"\\u") {
                        return Err(self.err("unpaired surrogate in string"));
                    }
                    self.pos += 2;
                    let second = self.read_hex4()?;
                    if !(0xDC00..0xE000).contains(&second) {
                        return Err(self.err("invalid low surrogate in string"));
                    }
                    0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
                } else {
                    first
                };
                let ch = char::from_u32(ch).ok_or_else(|| self.err("invalid unicode escape"))?;
                out.push(ch);
            }
            other => {
                return Err(self.err(format!("invalid escape '\\{}'", other as char)));
            }
        }
        Ok(())
    }

    fn read_hex4(&mut self) -> DocumentResult<u32> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.err("truncated unicode escape"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.err("invalid unicode escape"));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| self.err("invalid unicode escape"))?;
        self.pos += 4;
        Ok(value)
    }

    fn read_number(&mut self) -> DocumentResult<Number> {
        let bytes = self.bytes();
        let start = self.pos;
        let mut i = self.pos;
        let mut is_float = false;

        if bytes.get(i) == Some(&b'-') {
            i += 1;
        }
        let int_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if int_start == i {
            return Err(self.err("invalid number (expected digits)"));
        }
        if bytes.get(i) == Some(&b'.') {
            is_float = true;
            i += 1;
            let frac_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if frac_start == i {
                return Err(self.err("invalid number fraction (expected digits)"));
            }
        }
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            is_float = true;
            i += 1;
            if matches!(bytes.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
            let exp_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if exp_start == i {
                return Err(self.err("invalid number exponent (expected digits)"));
            }
        }

        let text = &self.input[start..i];
        let number = if is_float {
            None
        } else if let Ok(v) = text.parse::<i64>() {
            Some(Number::from(v))
        } else {
            text.parse::<u64>().ok().map(Number::from)
        };
        let number = match number {
            Some(n) => n,
            None => text
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .ok_or_else(|| self.err(format!("number out of range '{text}'")))?,
        };
        self.pos = i;
        Ok(number)
    }
}

impl TokenReader for JsonReader<'_> {
    fn peek(&mut self) -> DocumentResult<TokenKind> {
        if let Some(kind) = self.peeked {
            return Ok(kind);
        }
        let kind = self.compute_peek()?;
        self.peeked = Some(kind);
        Ok(kind)
    }

    fn begin_object(&mut self) -> DocumentResult<()> {
        self.expect(TokenKind::BeginObject)?;
        self.pos += 1;
        self.mark_value();
        self.stack.push(ReadScope::Object(ObjectState::Start));
        Ok(())
    }

    fn end_object(&mut self) -> DocumentResult<()> {
        self.expect(TokenKind::EndObject)?;
        self.pos += 1;
        self.stack.pop();
        Ok(())
    }

    fn begin_array(&mut self) -> DocumentResult<()> {
        self.expect(TokenKind::BeginArray)?;
        self.pos += 1;
        self.mark_value();
        self.stack.push(ReadScope::Array { first: true });
        Ok(())
    }

    fn end_array(&mut self) -> DocumentResult<()> {
        self.expect(TokenKind::EndArray)?;
        self.pos += 1;
        self.stack.pop();
        Ok(())
    }

    fn next_name(&mut self) -> DocumentResult<String> {
        self.expect(TokenKind::Name)?;
        let name = if matches!(self.bytes()[self.pos], b'"' | b'\'') {
            self.read_string()?
        } else {
            self.read_ident().to_owned()
        };
        if self.peek_byte()? != Some(b':') {
            return Err(self.err(format!("expected ':' after member name '{name}'")));
        }
        self.pos += 1;
        if let Some(ReadScope::Object(state)) = self.stack.last_mut() {
            *state = ObjectState::AfterName;
        }
        Ok(name)
    }

    fn next_string(&mut self) -> DocumentResult<String> {
        self.expect(TokenKind::String)?;
        let s = self.read_string()?;
        self.mark_value();
        Ok(s)
    }

    fn next_number(&mut self) -> DocumentResult<Number> {
        self.expect(TokenKind::Number)?;
        let n = self.read_number()?;
        self.mark_value();
        Ok(n)
    }

    fn next_bool(&mut self) -> DocumentResult<bool> {
        self.expect(TokenKind::Boolean)?;
        let value = self.read_ident() == "true";
        self.mark_value();
        Ok(value)
    }

    fn next_null(&mut self) -> DocumentResult<()> {
        self.expect(TokenKind::Null)?;
        self.read_ident();
        self.mark_value();
        Ok(())
    }

    fn offset(&self) -> usize {
        self.pos
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[derive(Clone, Copy, Debug)]
struct WriteScope {
    object: bool,
    first: bool,
}

/// Writer producing JSON text through a `serde_json` formatter.
///
/// The formatter decides layout; this type only enforces token sequencing.
#[derive(Debug)]
pub struct JsonWriter<F = CompactFormatter> {
    out: Vec<u8>,
    formatter: F,
    stack: Vec<WriteScope>,
    after_name: bool,
    root_written: bool,
}

impl JsonWriter<CompactFormatter> {
    pub fn compact() -> Self {
        Self::with_formatter(CompactFormatter)
    }
}

impl<'a> JsonWriter<PrettyFormatter<'a>> {
    pub fn pretty(indent: &'a str) -> Self {
        Self::with_formatter(PrettyFormatter::with_indent(indent.as_bytes()))
    }
}

impl<F: Formatter> JsonWriter<F> {
    pub fn with_formatter(formatter: F) -> Self {
        Self {
            out: Vec::new(),
            formatter,
            stack: Vec::new(),
            after_name: false,
            root_written: false,
        }
    }

    /// Return the written text once exactly one complete top-level value was emitted.
    pub fn finish(self) -> DocumentResult<String> {
        if !self.stack.is_empty() || self.after_name {
            return Err(DocumentError::Write("document is not complete".to_string()));
        }
        if !self.root_written {
            return Err(DocumentError::Write("nothing was written".to_string()));
        }
        String::from_utf8(self.out).map_err(write_err)
    }

    fn before_value(&mut self) -> DocumentResult<()> {
        match self.stack.last_mut() {
            Some(WriteScope { object: true, .. }) => {
                if !self.after_name {
                    return Err(DocumentError::Write(
                        "object value written without a name".to_string(),
                    ));
                }
                self.after_name = false;
                self.formatter
                    .begin_object_value(&mut self.out)
                    .map_err(write_err)
            }
            Some(scope) => {
                let first = scope.first;
                scope.first = false;
                self.formatter
                    .begin_array_value(&mut self.out, first)
                    .map_err(write_err)
            }
            None => {
                if self.root_written {
                    return Err(DocumentError::Write(
                        "more than one top-level value".to_string(),
                    ));
                }
                self.root_written = true;
                Ok(())
            }
        }
    }

    fn after_value(&mut self) -> DocumentResult<()> {
        let written = match self.stack.last() {
            Some(WriteScope { object: true, .. }) => self.formatter.end_object_value(&mut self.out),
            Some(_) => self.formatter.end_array_value(&mut self.out),
            None => Ok(()),
        };
        written.map_err(write_err)
    }

    fn close(&mut self, object: bool) -> DocumentResult<()> {
        match self.stack.last() {
            Some(scope) if scope.object == object && !self.after_name => {
                self.stack.pop();
                let written = if object {
                    self.formatter.end_object(&mut self.out)
                } else {
                    self.formatter.end_array(&mut self.out)
                };
                written.map_err(write_err)?;
                self.after_value()
            }
            _ => Err(DocumentError::Write(format!(
                "unbalanced '{}'",
                if object { '}' } else { ']' }
            ))),
        }
    }

    fn open(&mut self, object: bool) -> DocumentResult<()> {
        self.before_value()?;
        let written = if object {
            self.formatter.begin_object(&mut self.out)
        } else {
            self.formatter.begin_array(&mut self.out)
        };
        written.map_err(write_err)?;
        self.stack.push(WriteScope {
            object,
            first: true,
        });
        Ok(())
    }
}

impl<F: Formatter> TokenWriter for JsonWriter<F> {
    fn begin_object(&mut self) -> DocumentResult<()> {
        self.open(true)
    }

    fn end_object(&mut self) -> DocumentResult<()> {
        self.close(true)
    }

    fn begin_array(&mut self) -> DocumentResult<()> {
        self.open(false)
    }

    fn end_array(&mut self) -> DocumentResult<()> {
        self.close(false)
    }

    fn name(&mut self, name: &str) -> DocumentResult<()> {
        let scope = match self.stack.last_mut() {
            Some(scope) if scope.object && !self.after_name => scope,
            _ => {
                return Err(DocumentError::Write(format!(
                    "name '{name}' written outside of an object"
                )));
            }
        };
        let first = scope.first;
        scope.first = false;
        self.formatter
            .begin_object_key(&mut self.out, first)
            .map_err(write_err)?;
        serde_json::to_writer(&mut self.out, name).map_err(write_err)?;
        self.formatter
            .end_object_key(&mut self.out)
            .map_err(write_err)?;
        self.after_name = true;
        Ok(())
    }

    fn string(&mut self, value: &str) -> DocumentResult<()> {
        self.before_value()?;
        serde_json::to_writer(&mut self.out, value).map_err(write_err)?;
        self.after_value()
    }

    fn number(&mut self, value: &Number) -> DocumentResult<()> {
        self.before_value()?;
        serde_json::to_writer(&mut self.out, value).map_err(write_err)?;
        self.after_value()
    }

    fn bool(&mut self, value: bool) -> DocumentResult<()> {
        self.before_value()?;
        self.formatter
            .write_bool(&mut self.out, value)
            .map_err(write_err)?;
        self.after_value()
    }

    fn null(&mut self) -> DocumentResult<()> {
        self.before_value()?;
        self.formatter.write_null(&mut self.out).map_err(write_err)?;
        self.after_value()
    }
}

fn write_err(e: impl std::fmt::Display) -> DocumentError {
    DocumentError::Write(e.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/document/token.rs"]
mod tests;
