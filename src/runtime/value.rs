//! Runtime values and the coercions the emitted text relies on

use std::cmp::Ordering;
use std::fmt;

use crate::codegen::literals::format_number;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric conversion: undefined is NaN, null is 0, booleans are 0 or 1,
    /// text is parsed as a numeric literal
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Text(s) => text_to_number(s),
        }
    }

    /// `==` semantics
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
            (Value::Text(a), Value::Text(b)) => a == b,
            (a, b) => a.to_number() == b.to_number(),
        }
    }

    /// Relational ordering; `None` when the comparison is always false
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
            (a, b) => a.to_number().partial_cmp(&b.to_number()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn is_script_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}' | '\u{0020}' | '\u{00A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}

/// Parse text the way the target language's `Number()` does
pub fn text_to_number(text: &str) -> f64 {
    let s = text.trim_matches(is_script_whitespace);
    if s.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            return digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
        }
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust also accepts "inf" and "nan" spellings; the target language does not
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_number() {
        assert_eq!(text_to_number("42"), 42.0);
        assert_eq!(text_to_number("  3.5\n"), 3.5);
        assert_eq!(text_to_number(""), 0.0);
        assert_eq!(text_to_number("0x1F"), 31.0);
        assert_eq!(text_to_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(text_to_number(".5"), 0.5);
        assert!(text_to_number("inf").is_nan());
        assert!(text_to_number("12px").is_nan());
        assert!(text_to_number("-0x10").is_nan());
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Number(5.0).loose_eq(&Value::Text("5".into())));
        assert!(Value::Undefined.loose_eq(&Value::Undefined));
        assert!(!Value::Undefined.loose_eq(&Value::Number(f64::NAN)));
        assert!(!Value::Number(f64::NAN).loose_eq(&Value::Number(f64::NAN)));
        assert!(!Value::Text("a".into()).loose_eq(&Value::Text("A".into())));
    }

    #[test]
    fn test_boolean_and_null_coercion() {
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::Null.loose_eq(&Value::Number(0.0)));
        assert!(Value::Bool(true).loose_eq(&Value::Text("1".into())));
        assert_eq!(Value::Bool(true).compare(&Value::Number(5.0)), Some(Ordering::Less));
        assert_eq!(Value::Null.compare(&Value::Number(-1.0)), Some(Ordering::Greater));
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            Value::Text("10".into()).compare(&Value::Text("9".into())),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Text("10".into()).compare(&Value::Number(9.0)),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Undefined.compare(&Value::Number(5.0)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Text("hi".into()).to_string(), "hi");
    }
}
