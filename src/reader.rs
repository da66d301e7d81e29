use logos::{Logos, Span};
use std::fmt;

use log::debug;

use crate::error::{error_at, SpannedError, SpannedResult, SyntaxError};
use crate::value::Value;

//===----------------------------------------------------------------------===//
// Utils
//===----------------------------------------------------------------------===//

/// Decodes the backslash escapes of a string literal body (without the
/// surrounding quotes). Besides the single-character escapes this accepts
/// `\xHH`, `\uHHHH`, `\UHHHHHHHH` and three-digit octal `\NNN`; anything
/// else is rejected.
fn unescape_string(s: &str) -> Result<String, SyntaxError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        let escape = match chars.next() {
            Some(escape) => escape,
            None => return Err(SyntaxError::BadEscape { sequence: "\\".to_string() }),
        };
        let decoded = match escape {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '"' => '"',
            '\\' => '\\',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'x' => numeric_escape(escape, &mut chars, 2, 16)?,
            'u' => numeric_escape(escape, &mut chars, 4, 16)?,
            'U' => numeric_escape(escape, &mut chars, 8, 16)?,
            '0'..='7' => {
                let mut digits = String::from(escape);
                digits.extend(chars.next_if(|c| c.is_digit(8)));
                digits.extend(chars.next_if(|c| c.is_digit(8)));
                match u8::from_str_radix(&digits, 8) {
                    Ok(byte) if digits.len() == 3 => char::from(byte),
                    _ => return Err(SyntaxError::BadEscape { sequence: format!("\\{}", digits) }),
                }
            }
            other => {
                return Err(SyntaxError::BadEscape { sequence: format!("\\{}", other) });
            }
        };
        result.push(decoded);
    }

    Ok(result)
}

/// Reads exactly `width` digits after `\x`, `\u` or `\U`. `\x` yields a
/// single byte, read as the Latin-1 character of that value.
fn numeric_escape(
    escape: char,
    chars: &mut std::iter::Peekable<std::str::Chars>,
    width: usize,
    radix: u32,
) -> Result<char, SyntaxError> {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.next_if(|c| c.is_digit(radix)) {
            Some(digit) => digits.push(digit),
            None => break,
        }
    }
    let bad = || SyntaxError::BadEscape { sequence: format!("\\{}{}", escape, digits) };
    if digits.len() != width {
        return Err(bad());
    }
    u32::from_str_radix(&digits, radix).ok().and_then(char::from_u32).ok_or_else(bad)
}

/// Returns the text between the quotes of a string token, or `None` when the
/// closing quote is missing.
fn string_body(raw: &str) -> Option<&str> {
    let inner = raw.strip_prefix('"')?;
    let mut chars = inner.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '"' if idx + 1 == inner.len() => return Some(&inner[..idx]),
            _ => {}
        }
    }
    None
}

/// `[+-]?[0-9]+`
fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

//===----------------------------------------------------------------------===//
// Token
//===----------------------------------------------------------------------===//

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f,]+")]
pub enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Reader-macro characters. Without a macro system they read as symbols.
    #[token("'")]
    Quote,
    #[token("`")]
    Backtick,
    #[token("~")]
    Tilde,
    #[token("~@")]
    TildeAt,
    #[token("^")]
    Caret,
    #[token("@")]
    At,

    #[regex(r";[^\n]*")]
    Comment,

    // Raw slice, quotes included. The closing quote is optional here so that a
    // string running to the end of input still lexes; the parser rejects it.
    #[regex(r#""([^"\\]|\\.)*"?"#, |lex| lex.slice().to_owned())]
    Str(String),

    // Numbers, literals, keywords and symbols. Classified by `read_atom`.
    #[regex(
        r#"[^ \t\r\n\f\[\]{}()'"`,;~^@][^ \t\r\n\f\[\]{}()'"`,;]*"#,
        |lex| lex.slice().to_owned()
    )]
    Atom(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Quote => write!(f, "'"),
            Token::Backtick => write!(f, "`"),
            Token::Tilde => write!(f, "~"),
            Token::TildeAt => write!(f, "~@"),
            Token::Caret => write!(f, "^"),
            Token::At => write!(f, "@"),
            Token::Comment => write!(f, ";"),
            Token::Str(s) | Token::Atom(s) => write!(f, "{}", s),
        }
    }
}

/// A token and the byte range it was read from.
#[derive(Debug, PartialEq, Clone)]
pub struct Lexeme {
    pub token: Token,
    pub span: Span,
}

//===----------------------------------------------------------------------===//
// Reader
//===----------------------------------------------------------------------===//

/// Cursor over the token stream.
#[derive(Debug)]
pub struct Reader {
    tokens: Vec<Lexeme>,
    position: usize,
    eof: usize,
}

impl Reader {
    /// Returns the current token and advances past it.
    pub fn next(&mut self) -> SpannedResult<&Lexeme> {
        let lexeme = self
            .tokens
            .get(self.position)
            .ok_or_else(|| error_at(self.eof..self.eof, SyntaxError::UnexpectedEOF))?;
        self.position += 1;
        Ok(lexeme)
    }

    /// Returns the current token without consuming it.
    pub fn peek(&self) -> SpannedResult<&Lexeme> {
        self.tokens
            .get(self.position)
            .ok_or_else(|| error_at(self.eof..self.eof, SyntaxError::UnexpectedEOF))
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }
}

//===----------------------------------------------------------------------===//
// Tokenizer
//===----------------------------------------------------------------------===//

pub fn tokenize(source: &str) -> SpannedResult<Reader> {
    let mut lexer = Token::lexer(source);
    let mut tokens: Vec<Lexeme> = vec![];

    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::Comment) => continue,
            Ok(token) => tokens.push(Lexeme { token, span: lexer.span() }),
            // The atom pattern accepts any character the other tokens reject
            Err(()) => unreachable!("no token matches {:?}", lexer.slice()),
        }
    }

    debug!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(Reader { tokens, position: 0, eof: source.len() })
}

//===----------------------------------------------------------------------===//
// Parser
//===----------------------------------------------------------------------===//

/// Reads a single non-collection value.
fn read_atom(reader: &mut Reader) -> SpannedResult<Value> {
    let Lexeme { token, span } = reader.next()?.clone();
    match token {
        Token::Str(raw) => match string_body(&raw) {
            Some(body) => unescape_string(body).map(Value::String).map_err(|e| error_at(span, e)),
            None => Err(error_at(span, SyntaxError::UnterminatedString { value: raw.clone() })),
        },
        Token::Atom(text) => parse_atom_text(text).map_err(|e| error_at(span, e)),
        // Lone reader-macro characters
        other => Ok(Value::Symbol(other.to_string())),
    }
}

fn parse_atom_text(text: String) -> Result<Value, SyntaxError> {
    if is_integer(&text) {
        return text
            .parse::<i64>()
            .map(Value::Number)
            .map_err(|_| SyntaxError::InvalidNumber { value: text });
    }
    let value = match text.as_str() {
        "nil" => Value::NIL,
        "true" => Value::TRUE,
        "false" => Value::FALSE,
        other => match other.strip_prefix(':') {
            Some(name) => Value::Keyword(name.to_string()),
            None => Value::Symbol(other.to_string()),
        },
    };
    Ok(value)
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum CollType {
    List,
    Vector,
    Hashmap,
}

impl CollType {
    fn delimiters(self) -> (char, char) {
        match self {
            CollType::List => ('(', ')'),
            CollType::Vector => ('[', ']'),
            CollType::Hashmap => ('{', '}'),
        }
    }

    fn closes(self, token: &Token) -> bool {
        matches!(
            (self, token),
            (CollType::List, Token::RParen)
                | (CollType::Vector, Token::RBracket)
                | (CollType::Hashmap, Token::RBrace)
        )
    }
}

/// Reads forms up to the closing delimiter of `coll_type`, consuming both
/// delimiters.
fn read_sequence(reader: &mut Reader, coll_type: CollType) -> SpannedResult<Value> {
    let open_span = reader.next()?.span.clone();
    let mut seq: Vec<Value> = vec![];

    loop {
        let lexeme = match reader.peek() {
            Ok(lexeme) => lexeme,
            Err(_) => {
                let (delimiter, expected) = coll_type.delimiters();
                return Err(error_at(
                    open_span.clone(),
                    SyntaxError::UnbalancedDelimiter {
                        delimiter,
                        expected,
                        position: open_span.start,
                    },
                ));
            }
        };
        if coll_type.closes(&lexeme.token) {
            break;
        }
        seq.push(read_form(reader)?);
    }
    let close_span = reader.next()?.span.clone();

    match coll_type {
        CollType::List => Ok(Value::list(seq)),
        CollType::Vector => Ok(Value::vector(seq)),
        CollType::Hashmap => read_hashmap(seq, open_span.start..close_span.end),
    }
}

fn read_hashmap(seq: Vec<Value>, span: Span) -> SpannedResult<Value> {
    if seq.len() % 2 != 0 {
        return Err(error_at(
            span,
            SyntaxError::InvalidMap {
                reason: format!("expected an even number of forms, got {}", seq.len()),
            },
        ));
    }
    if let Some(bad) = seq
        .iter()
        .step_by(2)
        .find(|key| !matches!(key, Value::String(_) | Value::Keyword(_)))
    {
        return Err(error_at(
            span,
            SyntaxError::InvalidMap {
                reason: format!("keys must be strings or keywords, got {}", bad),
            },
        ));
    }
    Value::hashmap_from_sequence(seq).map_err(|e| SpannedError { error: e, span })
}

/// Reads a single form.
fn read_form(reader: &mut Reader) -> SpannedResult<Value> {
    let Lexeme { token, span } = reader.peek()?.clone();
    let unexpected = |delimiter: char| -> SpannedResult<Value> {
        Err(error_at(span, SyntaxError::UnexpectedDelimiter { delimiter }))
    };
    match token {
        Token::LParen => read_sequence(reader, CollType::List),
        Token::LBracket => read_sequence(reader, CollType::Vector),
        Token::LBrace => read_sequence(reader, CollType::Hashmap),
        Token::RParen => unexpected(')'),
        Token::RBracket => unexpected(']'),
        Token::RBrace => unexpected('}'),
        _ => read_atom(reader),
    }
}

/// Reads the first form of `source`. Anything after it is ignored.
pub fn read(source: &str) -> SpannedResult<Value> {
    let mut reader = tokenize(source)?;
    if reader.is_exhausted() {
        return Err(error_at(0..0, SyntaxError::EmptyInput));
    }
    let form = read_form(&mut reader)?;
    if !reader.is_exhausted() {
        debug!("ignoring {} trailing tokens", reader.remaining());
    }
    Ok(form)
}

/// Reads every top-level form of `source`.
pub fn read_all(source: &str) -> SpannedResult<Vec<Value>> {
    let mut reader = tokenize(source)?;
    let mut forms = vec![];
    while !reader.is_exhausted() {
        forms.push(read_form(&mut reader)?);
    }
    Ok(forms)
}
