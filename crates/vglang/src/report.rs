//! Top-level error reporting
//!
//! Renders a runtime error the way the language front end shows it: a
//! bold red header with the error category and location, followed by a
//! yellow arrow line with the message. Reporting never panics and leaves
//! the interpreter reusable.

use crate::error::RuntimeError;

const ANSI_RED: &str = "\u{1b}[31m";
const ANSI_YELLOW: &str = "\u{1b}[33m";
const ANSI_RESET: &str = "\u{1b}[0m";
const ANSI_BOLD: &str = "\u{1b}[1m";

/// Render an error as the two-line report form.
pub fn format_error(err: &RuntimeError, file: Option<&str>, color: bool) -> String {
    let mut out = String::new();

    if color {
        out.push_str(ANSI_BOLD);
        out.push_str(ANSI_RED);
    }
    out.push_str("VG Error: ");
    out.push_str(err.kind_label());
    if color {
        out.push_str(ANSI_RESET);
    }

    if let Some(span) = err.span() {
        out.push_str(&format!(" at line {}:{}", span.line, span.column));
    }
    if let Some(file) = file {
        out.push_str(&format!(" in file '{}'", file));
    }
    out.push('\n');

    if color {
        out.push_str(ANSI_YELLOW);
    }
    out.push_str(&format!("  → {}", err));
    if color {
        out.push_str(ANSI_RESET);
    }

    out
}

/// Report an error to stderr with color.
pub fn print_error(err: &RuntimeError, file: Option<&str>) {
    eprintln!("{}", format_error(err, file, true));
}

/// Report a warning to stderr with color.
pub fn print_warning(message: &str) {
    eprintln!("{}Warning: {}{}", ANSI_YELLOW, message, ANSI_RESET);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;

    #[test]
    fn test_plain_format_contains_location_and_message() {
        let err = RuntimeError::UndefinedName {
            kind: "variable",
            name: "x".into(),
            span: Some(Span::new(12, 4)),
        };
        let report = format_error(&err, Some("main.vg"), false);
        assert_eq!(
            report,
            "VG Error: Name Error at line 12:4 in file 'main.vg'\n  → variable 'x' is not defined"
        );
    }

    #[test]
    fn test_format_without_span_or_file() {
        let err = RuntimeError::StackOverflow {
            depth: 1000,
            max: 1000,
        };
        let report = format_error(&err, None, false);
        assert!(report.starts_with("VG Error: Stack Overflow\n"));
    }

    #[test]
    fn test_colored_format_wraps_with_ansi() {
        let err = RuntimeError::DivisionByZero { span: None };
        let report = format_error(&err, None, true);
        assert!(report.contains(ANSI_RED));
        assert!(report.contains(ANSI_YELLOW));
        assert!(report.ends_with(ANSI_RESET));
    }
}
