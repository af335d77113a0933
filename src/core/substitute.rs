/// Variable substitution — the final pass from expanded template to output text.

use std::fmt;
use std::str::FromStr;

use crate::schema::config::Variable;

/// Opening and closing markup placed around each substituted value.
pub const EMPHASIS_OPEN: &str = "<strong>";
pub const EMPHASIS_CLOSE: &str = "</strong>";
/// Markup replacing every line break in decorated output.
pub const LINE_BREAK: &str = "<br/>";

/// How substituted text is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Raw text for the clipboard and share links.
    Plain,
    /// HTML for on-screen display: escaped, values emphasized, `<br/>` line breaks.
    Decorated,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(RenderMode::Plain),
            "html" | "decorated" => Ok(RenderMode::Decorated),
            other => Err(format!("unknown render mode '{}'", other)),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Plain => f.write_str("plain"),
            RenderMode::Decorated => f.write_str("decorated"),
        }
    }
}

/// Replace `{id}` tokens with each variable's effective value.
///
/// A single left-to-right pass: text inserted for one variable is never
/// scanned again, so a value that itself contains `{other}` comes out
/// literally. Tokens naming no variable are kept as-is. Declaration order
/// only decides between ids that themselves contain a `}`.
pub fn substitute(text: &str, variables: &[Variable], mode: RenderMode) -> String {
    let tokens: Vec<(String, &str)> = variables
        .iter()
        .map(|v| (v.placeholder(), v.effective_value()))
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let Some(brace) = rest.find('{') else {
            push_literal(&mut out, rest, mode);
            break;
        };
        push_literal(&mut out, &rest[..brace], mode);
        rest = &rest[brace..];

        match tokens.iter().find(|(token, _)| rest.starts_with(token.as_str())) {
            Some((token, value)) => {
                push_value(&mut out, value, mode);
                rest = &rest[token.len()..];
            }
            None => {
                push_literal(&mut out, "{", mode);
                rest = &rest[1..];
            }
        }
    }

    out
}

fn push_literal(out: &mut String, text: &str, mode: RenderMode) {
    match mode {
        RenderMode::Plain => out.push_str(text),
        RenderMode::Decorated => push_escaped(out, text, true),
    }
}

fn push_value(out: &mut String, value: &str, mode: RenderMode) {
    match mode {
        RenderMode::Plain => out.push_str(value),
        RenderMode::Decorated => {
            out.push_str(EMPHASIS_OPEN);
            push_escaped(out, value, true);
            out.push_str(EMPHASIS_CLOSE);
        }
    }
}

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text, false);
    out
}

/// HTML-escape `text` into `out`, optionally turning line breaks into
/// [`LINE_BREAK`].
fn push_escaped(out: &mut String, text: &str, line_breaks: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' if line_breaks => out.push_str(LINE_BREAK),
            c => out.push(c),
        }
    }
}
