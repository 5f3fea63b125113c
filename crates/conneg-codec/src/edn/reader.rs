use crate::codec::CodecError;
use conneg_core::{Map, Value};

const MAX_DEPTH: usize = 256;

/// Read exactly one EDN form; blank input reads as nil
///
/// Lists and sets read as vectors, characters as one-character strings.
pub fn read_str(input: &str) -> Result<Value, CodecError> {
    let mut reader = Reader {
        src: input,
        pos: 0,
        depth: 0,
    };
    reader.skip_ignored()?;
    if reader.at_end() {
        return Ok(Value::Nil);
    }
    let value = reader.read_form()?;
    reader.skip_ignored()?;
    if !reader.at_end() {
        return Err(reader.error("trailing characters after form"));
    }
    Ok(value)
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';')
}

impl<'a> Reader<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: &str) -> CodecError {
        CodecError::Deserialization(format!("edn: {message} at offset {}", self.pos))
    }

    /// Skip whitespace, commas, comments and `#_` discarded forms
    fn skip_ignored(&mut self) -> Result<(), CodecError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() || c == ',' => {
                    self.bump();
                }
                Some(';') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('#') if self.peek_second() == Some('_') => {
                    self.pos += 2;
                    self.read_form()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_form(&mut self) -> Result<Value, CodecError> {
        self.skip_ignored()?;
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        let value = self.read_form_inner();
        self.depth -= 1;
        value
    }

    fn read_form_inner(&mut self) -> Result<Value, CodecError> {
        let c = self
            .peek()
            .ok_or_else(|| self.error("unexpected end of input"))?;
        match c {
            '(' => {
                self.bump();
                Ok(Value::Vector(self.read_seq(')')?))
            }
            '[' => {
                self.bump();
                Ok(Value::Vector(self.read_seq(']')?))
            }
            '{' => {
                self.bump();
                self.read_map()
            }
            ')' | ']' | '}' => Err(self.error("unmatched delimiter")),
            '"' => {
                self.bump();
                self.read_string().map(Value::String)
            }
            '\\' => {
                self.bump();
                self.read_char().map(|c| Value::String(c.to_string()))
            }
            ':' => {
                self.bump();
                let name = self.read_token();
                if name.is_empty() {
                    return Err(self.error("empty keyword"));
                }
                Ok(Value::Keyword(name.to_string()))
            }
            '#' => {
                self.bump();
                self.read_dispatch()
            }
            c if c.is_ascii_digit() => self.read_number(),
            '+' | '-' if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => {
                self.read_number()
            }
            _ => self.read_symbol(),
        }
    }

    fn read_seq(&mut self, close: char) -> Result<Vec<Value>, CodecError> {
        let mut items = Vec::new();
        loop {
            self.skip_ignored()?;
            match self.peek() {
                None => return Err(self.error("unterminated collection")),
                Some(c) if c == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(_) => items.push(self.read_form()?),
            }
        }
    }

    fn read_map(&mut self) -> Result<Value, CodecError> {
        let items = self.read_seq('}')?;
        if items.len() % 2 != 0 {
            return Err(self.error("map literal needs an even number of forms"));
        }
        let mut map = Map::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
            map.insert(k, v);
        }
        Ok(Value::Map(map))
    }

    fn read_dispatch(&mut self) -> Result<Value, CodecError> {
        match self.peek() {
            // sets read as vectors
            Some('{') => {
                self.bump();
                Ok(Value::Vector(self.read_seq('}')?))
            }
            Some('#') => {
                self.bump();
                match self.read_token() {
                    "Inf" => Ok(Value::Float(f64::INFINITY)),
                    "-Inf" => Ok(Value::Float(f64::NEG_INFINITY)),
                    "NaN" => Ok(Value::Float(f64::NAN)),
                    other => Err(self.error(&format!("unknown symbolic value ##{other}"))),
                }
            }
            Some(c) if c.is_alphabetic() => {
                let tag = self.read_token().to_string();
                let value = self.read_form()?;
                Ok(Value::tagged(tag, value))
            }
            _ => Err(self.error("unsupported dispatch character")),
        }
    }

    fn read_token(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            self.bump();
        }
        &src[start..self.pos]
    }

    fn take(&mut self, count: usize) -> Result<&'a str, CodecError> {
        let src = self.src;
        let start = self.pos;
        for _ in 0..count {
            self.bump()
                .ok_or_else(|| self.error("unexpected end of input"))?;
        }
        Ok(&src[start..self.pos])
    }

    fn read_string(&mut self) -> Result<String, CodecError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('"') => return Ok(out),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('u') => {
                            let hex = self.take(4)?;
                            self.unicode_escape(hex)?
                        }
                        _ => return Err(self.error("invalid string escape")),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn read_char(&mut self) -> Result<char, CodecError> {
        let src = self.src;
        let start = self.pos;
        let first = self
            .bump()
            .ok_or_else(|| self.error("unexpected end of input"))?;
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            self.bump();
        }
        let token = &src[start..self.pos];
        if token.chars().count() == 1 {
            return Ok(first);
        }
        match token {
            "newline" => Ok('\n'),
            "space" => Ok(' '),
            "tab" => Ok('\t'),
            "return" => Ok('\r'),
            "formfeed" => Ok('\u{c}'),
            "backspace" => Ok('\u{8}'),
            t if t.len() == 5 && t.starts_with('u') => self.unicode_escape(&t[1..]),
            _ => Err(self.error(&format!("unknown character literal \\{token}"))),
        }
    }

    fn unicode_escape(&self, hex: &str) -> Result<char, CodecError> {
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(&format!("invalid unicode escape {hex}")))
    }

    fn read_number(&mut self) -> Result<Value, CodecError> {
        let token = self.read_token();
        parse_number(token).ok_or_else(|| self.error(&format!("invalid number {token}")))
    }

    fn read_symbol(&mut self) -> Result<Value, CodecError> {
        let token = self.read_token();
        match token {
            "" => Err(self.error("unexpected character")),
            "nil" => Ok(Value::Nil),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            symbol => Ok(Value::Symbol(symbol.to_string())),
        }
    }
}

fn parse_number(token: &str) -> Option<Value> {
    if let Some(int) = token.strip_suffix('N') {
        return int.parse::<i64>().ok().map(Value::Integer);
    }
    if let Some(decimal) = token.strip_suffix('M') {
        return decimal.parse::<f64>().ok().map(Value::Float);
    }
    if let Some((numerator, denominator)) = token.split_once('/') {
        let n = numerator.parse::<f64>().ok()?;
        let d = denominator.parse::<f64>().ok().filter(|d| *d != 0.0)?;
        return Some(Value::Float(n / d));
    }
    if token.contains(['.', 'e', 'E']) {
        return token.parse::<f64>().ok().map(Value::Float);
    }
    match token.parse::<i64>() {
        Ok(i) => Some(Value::Integer(i)),
        Err(_) => token.parse::<f64>().ok().map(Value::Float),
    }
}
