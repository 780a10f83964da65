//! Contextual hints for execution errors

use once_cell::sync::Lazy;
use regex::Regex;

static NOT_DEFINED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z_][a-zA-Z0-9_]*) is not defined").expect("valid hint pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorHint {
    /// A variable was read before anything set it; `None` when the name
    /// could not be extracted
    UndefinedVariable(Option<String>),
    Timeout,
    UnexpectedToken,
}

impl ErrorHint {
    /// Match an error message against the known patterns, first match wins
    pub fn detect(message: &str) -> Option<Self> {
        if message.contains("is not defined") {
            let name = NOT_DEFINED
                .captures(message)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string());
            Some(ErrorHint::UndefinedVariable(name))
        } else if message.contains("timeout") {
            Some(ErrorHint::Timeout)
        } else if message.contains("Unexpected token") {
            Some(ErrorHint::UnexpectedToken)
        } else {
            None
        }
    }

    pub fn tip(&self) -> String {
        match self {
            ErrorHint::UndefinedVariable(name) => format!(
                "Variable \"{}\" is used before being set. Add a \"Set Variable\" block first.",
                name.as_deref().unwrap_or("undefined")
            ),
            ErrorHint::Timeout => {
                "Workflow took too long. Check for infinite loops or reduce delay times.".to_string()
            }
            ErrorHint::UnexpectedToken => {
                "Code generation error. Try reconnecting your blocks.".to_string()
            }
        }
    }
}

/// The hint paragraph appended to an error, empty when nothing matches
pub fn hint_suffix(message: &str) -> String {
    ErrorHint::detect(message)
        .map(|hint| format!("\n\n💡 Tip: {}", hint.tip()))
        .unwrap_or_default()
}
