//! Tokenizer for console lines.
//!
//! ```text
//! Line       := Identifier (' ' Argument)*
//! Argument   := Token | '(' Line ')'
//! Token      := run of non-whitespace characters
//! ```
//!
//! The tokenizer never evaluates anything. It only finds the boundaries of
//! top-level arguments so the dispatcher can check arity before running any
//! nested sub-expression.

use super::ConsoleError;

/// A top-level argument as it appears in the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSource<'a> {
    /// A plain whitespace-delimited token.
    Token(&'a str),
    /// The text between a `(` and its matching `)`.
    Nested(&'a str),
}

impl<'a> ArgSource<'a> {
    /// The raw text of this argument (without parentheses for nested lines).
    pub fn raw(&self) -> &'a str {
        match self {
            ArgSource::Token(s) | ArgSource::Nested(s) => s,
        }
    }
}

/// Split a line into its leading identifier and the unconsumed remainder.
///
/// # Examples
///
/// ```
/// use bevy_dropdown_console::core::split_identifier;
///
/// assert_eq!(split_identifier("  set x 5").unwrap(), ("set", "x 5"));
/// assert!(split_identifier("   ").is_err());
/// ```
pub fn split_identifier(line: &str) -> Result<(&str, &str), ConsoleError> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return Err(ConsoleError::Syntax("empty line".into()));
    }
    if trimmed.starts_with('(') || trimmed.starts_with(')') {
        return Err(ConsoleError::Syntax(
            "a line must start with a command or variable name".into(),
        ));
    }

    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    Ok((&trimmed[..end], trimmed[end..].trim_start()))
}

/// Consume the next argument from `input`.
///
/// Returns `Ok(None)` once only whitespace remains. Otherwise returns the
/// argument and the remainder after it.
pub fn next_argument(input: &str) -> Result<Option<(ArgSource<'_>, &str)>, ConsoleError> {
    let input = input.trim_start();
    if input.is_empty() {
        return Ok(None);
    }

    if let Some(body) = input.strip_prefix('(') {
        let mut depth = 1usize;
        for (i, c) in body.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Some((ArgSource::Nested(&body[..i]), &body[i + 1..])));
                    }
                }
                _ => {}
            }
        }
        return Err(ConsoleError::Syntax("unbalanced '('".into()));
    }

    if input.starts_with(')') {
        return Err(ConsoleError::Syntax("unexpected ')'".into()));
    }

    let end = input
        .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .unwrap_or(input.len());
    Ok(Some((ArgSource::Token(&input[..end]), &input[end..])))
}

/// Split the remainder of a line into its top-level arguments.
///
/// # Examples
///
/// ```
/// use bevy_dropdown_console::core::{split_arguments, ArgSource};
///
/// let args = split_arguments("(- 3 2) (* 4 (+ 1 1)) x").unwrap();
/// assert_eq!(args, vec![
///     ArgSource::Nested("- 3 2"),
///     ArgSource::Nested("* 4 (+ 1 1)"),
///     ArgSource::Token("x"),
/// ]);
/// ```
pub fn split_arguments(input: &str) -> Result<Vec<ArgSource<'_>>, ConsoleError> {
    let mut args = Vec::new();
    let mut rest = input;
    while let Some((arg, remainder)) = next_argument(rest)? {
        args.push(arg);
        rest = remainder;
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_identifier() {
        assert_eq!(split_identifier("help").unwrap(), ("help", ""));
        assert_eq!(split_identifier("get   sv_gravity ").unwrap(), ("get", "sv_gravity "));
        assert_eq!(split_identifier("+ 1 2").unwrap(), ("+", "1 2"));
    }

    #[test]
    fn test_split_identifier_rejects_paren() {
        assert!(matches!(split_identifier("(+ 1 2)"), Err(ConsoleError::Syntax(_))));
    }

    #[test]
    fn test_split_tokens() {
        let args = split_arguments("  hello   world ").unwrap();
        assert_eq!(args, vec![ArgSource::Token("hello"), ArgSource::Token("world")]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_arguments("").unwrap().is_empty());
        assert!(split_arguments(" \t ").unwrap().is_empty());
    }

    #[test]
    fn test_split_nested_counts_as_one() {
        let args = split_arguments("(+ 1 (* 2 3)) 4").unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0], ArgSource::Nested("+ 1 (* 2 3)"));
        assert_eq!(args[1].raw(), "4");
    }

    #[test]
    fn test_split_adjacent_paren() {
        let args = split_arguments("a(b)").unwrap();
        assert_eq!(args, vec![ArgSource::Token("a"), ArgSource::Nested("b")]);
    }

    #[test]
    fn test_split_unbalanced() {
        assert!(matches!(split_arguments("(+ 1 2"), Err(ConsoleError::Syntax(_))));
        assert!(matches!(split_arguments("1 2)"), Err(ConsoleError::Syntax(_))));
    }

    #[test]
    fn test_split_unicode_token() {
        let args = split_arguments("héllo wörld").unwrap();
        assert_eq!(args, vec![ArgSource::Token("héllo"), ArgSource::Token("wörld")]);
    }
}
