//! Field system for block configuration
//!
//! Fields are the editable scalars shown on a block: free text, numbers and
//! dropdowns. Each definition carries a default, optional constraints, and a
//! UI hint for the editing surface.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::codegen::literals::format_number;

/// Field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name as used in the serialized tree (e.g. `VAR_NAME`)
    pub id: String,
    /// Field type
    pub field_type: FieldType,
    /// Field description
    pub description: String,
    /// Default value
    pub default_value: FieldValue,
    /// Optional constraints
    pub constraints: Option<FieldConstraints>,
    /// Optional UI hints
    pub ui_hint: Option<FieldUiHint>,
}

/// Field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Free text input
    Text,
    /// Numeric input
    Number,
    /// Fixed set of options
    Dropdown,
}

/// Field value as stored in the serialized tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Number value
    Number(f64),
    /// Text value (also used for dropdown option codes)
    Text(String),
}

impl FieldValue {
    /// Try to read as a number. Text is parsed leniently.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Read as text, formatting numbers the way the editor displays them
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Number(n) => Cow::Owned(format_number(*n)),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Number(i as f64)
    }
}

/// A dropdown entry: what the user sees and what gets stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Field constraints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldConstraints {
    /// Minimum value (for numbers)
    pub min: Option<f64>,
    /// Maximum value (for numbers)
    pub max: Option<f64>,
    /// Allowed options (for dropdowns)
    pub options: Option<Vec<DropdownOption>>,
}

impl FieldConstraints {
    /// Create a new empty constraints object
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum value
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set maximum value
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set allowed options
    pub fn with_options(mut self, options: Vec<DropdownOption>) -> Self {
        self.options = Some(options);
        self
    }

    fn clamp(&self, n: f64) -> f64 {
        let n = self.min.map_or(n, |min| n.max(min));
        self.max.map_or(n, |max| n.min(max))
    }

    fn allows(&self, code: &str) -> bool {
        self.options
            .as_ref()
            .map_or(true, |options| options.iter().any(|o| o.value == code))
    }
}

/// UI hints for field rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldUiHint {
    /// Widget type to use
    pub widget: WidgetType,
    /// Unit label
    pub unit: Option<String>,
}

impl FieldUiHint {
    /// Create a new UI hint with the specified widget
    pub fn new(widget: WidgetType) -> Self {
        Self {
            widget,
            unit: None,
        }
    }

    /// Set unit label
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Widget types for UI rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetType {
    /// Single-line text input
    TextInput,
    /// Number input
    NumberInput,
    /// Select dropdown
    Dropdown,
}

impl FieldDefinition {
    /// Free text field
    pub fn text(id: impl Into<String>, default: &str, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: FieldType::Text,
            description: description.into(),
            default_value: FieldValue::from(default),
            constraints: None,
            ui_hint: Some(FieldUiHint::new(WidgetType::TextInput)),
        }
    }

    /// Number field
    pub fn number(id: impl Into<String>, default: f64, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: FieldType::Number,
            description: description.into(),
            default_value: FieldValue::Number(default),
            constraints: None,
            ui_hint: Some(FieldUiHint::new(WidgetType::NumberInput)),
        }
    }

    /// Dropdown field; the default must be one of the option codes
    pub fn dropdown(
        id: impl Into<String>,
        options: Vec<DropdownOption>,
        default: &str,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field_type: FieldType::Dropdown,
            description: description.into(),
            default_value: FieldValue::from(default),
            constraints: Some(FieldConstraints::new().with_options(options)),
            ui_hint: Some(FieldUiHint::new(WidgetType::Dropdown)),
        }
    }

    pub fn with_constraints(mut self, constraints: FieldConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_ui_hint(mut self, ui_hint: FieldUiHint) -> Self {
        self.ui_hint = Some(ui_hint);
        self
    }

    /// Dropdown options, empty for other field types
    pub fn options(&self) -> &[DropdownOption] {
        self.constraints
            .as_ref()
            .and_then(|c| c.options.as_deref())
            .unwrap_or(&[])
    }

    /// Validate a value against the field type and constraints
    pub fn validate(&self, value: &FieldValue) -> ValidationResult {
        match self.field_type {
            FieldType::Text => ValidationResult::ok(),
            FieldType::Number => {
                let Some(n) = value.as_number() else {
                    return ValidationResult::error(format!("Field '{}' expects a number", self.id));
                };
                let mut result = ValidationResult::ok();
                if let Some(c) = &self.constraints {
                    if c.min.is_some_and(|min| n < min) || c.max.is_some_and(|max| n > max) {
                        result = ValidationResult::error(format!(
                            "Field '{}' value {} is out of range",
                            self.id,
                            format_number(n)
                        ));
                    }
                }
                result
            }
            FieldType::Dropdown => {
                let code = value.to_text();
                match &self.constraints {
                    Some(c) if !c.allows(&code) => ValidationResult::error(format!(
                        "Field '{}' has no option '{}'",
                        self.id, code
                    )),
                    _ => ValidationResult::ok(),
                }
            }
        }
    }

    /// Coerce a stored value into one the editor would accept.
    ///
    /// Missing or unparseable values take the default, numbers are clamped
    /// into range, and unknown dropdown codes revert to the default.
    pub fn conform(&self, value: Option<&FieldValue>) -> FieldValue {
        let Some(value) = value else {
            return self.default_value.clone();
        };
        match self.field_type {
            FieldType::Text => FieldValue::Text(value.to_text().into_owned()),
            FieldType::Number => match value.as_number() {
                Some(n) if !n.is_nan() => {
                    let n = self.constraints.as_ref().map_or(n, |c| c.clamp(n));
                    FieldValue::Number(n)
                }
                _ => self.default_value.clone(),
            },
            FieldType::Dropdown => {
                let code = value.to_text();
                match &self.constraints {
                    Some(c) if !c.allows(&code) => self.default_value.clone(),
                    _ => FieldValue::Text(code.into_owned()),
                }
            }
        }
    }
}

/// Validation result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,
    /// Error messages
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Create a validation result with an error
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![msg.into()],
        }
    }

    /// Check if the validation has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
