//! Text-level helpers shared by the generator: identifiers, string and number
//! literals, indentation, and the final whitespace cleanup.

/// Indentation applied to statement-slot bodies
pub const INDENT: &str = "  ";

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
///
/// Characters outside the basic plane count as two code units in the target
/// language and become two underscores. Distinct names can collide.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    out
}

/// Escape text for a double-quoted literal: backslashes first, then quotes.
pub fn escape_text_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Format a number the way the target language prints it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let s = format!("{n:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    format!("{n}")
}

/// Prefix the start of `code` and every line after a newline, except after
/// the final trailing newline.
pub fn prefix_lines(code: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(code.len() + prefix.len() * 4);
    out.push_str(prefix);
    for (i, c) in code.char_indices() {
        out.push(c);
        if c == '\n' && i + 1 != code.len() {
            out.push_str(prefix);
        }
    }
    out
}

/// Final cleanup of an assembled program:
/// leading blank lines go, trailing whitespace collapses to one newline, and
/// spaces or tabs before a newline are dropped.
pub fn normalize_program(code: &str) -> String {
    let mut text = code;
    let leading = text.len() - text.trim_start().len();
    if let Some(pos) = text[..leading].rfind('\n') {
        if pos >= 1 {
            text = &text[pos + 1..];
        }
    }

    let mut text = text.to_string();
    let trailing = text.trim_end().len();
    if let Some(rel) = text[trailing..].find('\n') {
        let pos = trailing + rel;
        if pos + 1 < text.len() {
            text.truncate(pos);
            text.push('\n');
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut pending = String::new();
    for c in text.chars() {
        match c {
            ' ' | '\t' => pending.push(c),
            '\n' => {
                pending.clear();
                out.push('\n');
            }
            _ => {
                out.push_str(&pending);
                pending.clear();
                out.push(c);
            }
        }
    }
    out.push_str(&pending);
    out
}
