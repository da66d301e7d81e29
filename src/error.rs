use logos::Span;
use thiserror::Error as ThisError;

//===----------------------------------------------------------------------===//
// Error
//===----------------------------------------------------------------------===//

/// Every failure the interpreter can report. Each one aborts the current
/// top-level evaluation.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    #[error(transparent)]
    SyntaxError(#[from] SyntaxError),
    /// Formal parameters and actual arguments could not be matched.
    #[error("Binding error: {0}")]
    BindingError(String),
    /// A symbol is not bound in any enclosing environment.
    #[error("Lookup error: '{0}' not found")]
    LookupError(String),
    /// A special form received the wrong number or kind of arguments.
    #[error("Shape error: {0}")]
    ShapeError(String),
    #[error("Not callable: {0}")]
    NotCallableError(String),
    /// A native function rejected its arguments.
    #[error("Operand error: {0}")]
    OperandError(String),
}

//===----------------------------------------------------------------------===//
// SyntaxError
//===----------------------------------------------------------------------===//

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum SyntaxError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Unexpected EOF")]
    UnexpectedEOF,
    #[error("Unexpected '{delimiter}'")]
    UnexpectedDelimiter { delimiter: char },
    #[error("Unbalanced '{delimiter}' at position {position}: expected '{expected}'")]
    UnbalancedDelimiter { delimiter: char, expected: char, position: usize },
    #[error("Unterminated string: {value}")]
    UnterminatedString { value: String },
    #[error("Bad escape sequence: {sequence}")]
    BadEscape { sequence: String },
    #[error("Invalid number: {value}")]
    InvalidNumber { value: String },
    #[error("Invalid map: {reason}")]
    InvalidMap { reason: String },
}

//===----------------------------------------------------------------------===//
// SpannedError
//===----------------------------------------------------------------------===//

/// An error tied to the byte range of the source that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedError {
    pub error: Error,
    pub span: Span,
}

pub type SpannedResult<T> = Result<T, SpannedError>;

pub fn error_at(span: Span, error: impl Into<Error>) -> SpannedError {
    SpannedError { error: error.into(), span }
}

//===----------------------------------------------------------------------===//
// Diagnostic
//===----------------------------------------------------------------------===//

/// An error ready to be shown to the user, together with the input that
/// caused it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub error: Error,
    /// Reader errors point into `source`; evaluation errors carry no span.
    pub span: Option<Span>,
    pub source: String,
}

impl Diagnostic {
    pub fn new(error: Error, source: &str) -> Self {
        Self { error, span: None, source: source.to_string() }
    }

    pub fn from_spanned(err: SpannedError, source: &str) -> Self {
        Self { error: err.error, span: Some(err.span), source: source.to_string() }
    }

    /// Renders the offending line with a caret underline when a span is known,
    /// followed by the message.
    pub fn format_error(&self) -> String {
        let span = match &self.span {
            Some(span) if span.start <= self.source.len() => span.clone(),
            _ => return format!("Error: {}", self.error),
        };

        let line_start = self.source[..span.start].rfind('\n').map(|pos| pos + 1).unwrap_or(0);
        let line_end = self.source[span.start..]
            .find('\n')
            .map(|pos| span.start + pos)
            .unwrap_or(self.source.len());

        let line_number = self.source[..span.start].matches('\n').count() + 1;
        let column = span.start - line_start + 1;

        let line_content = &self.source[line_start..line_end];
        let width = span.end.min(line_end).saturating_sub(span.start).max(1);
        let underline = " ".repeat(column - 1) + &"^".repeat(width);

        format!(
            "Error at ({}:{})\n{}\n{}\n{}",
            line_number, column, line_content, underline, self.error
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_caret_under_span() {
        let diag = Diagnostic::from_spanned(
            error_at(4..5, SyntaxError::UnexpectedDelimiter { delimiter: ')' }),
            "(+ 1)) 2",
        );
        let out = diag.format_error();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Error at (1:5)");
        assert_eq!(lines[1], "(+ 1)) 2");
        assert_eq!(lines[2], "    ^");
        assert_eq!(lines[3], "Unexpected ')'");
    }

    #[test]
    fn spanless_errors_print_message_only() {
        let diag = Diagnostic::new(Error::LookupError("foo".to_string()), "(foo)");
        assert_eq!(diag.format_error(), "Error: Lookup error: 'foo' not found");
    }

    #[test]
    fn second_line_position() {
        let diag = Diagnostic::from_spanned(
            error_at(6..7, SyntaxError::UnexpectedEOF),
            "(do\n  (",
        );
        assert!(diag.format_error().starts_with("Error at (2:3)"));
    }
}
