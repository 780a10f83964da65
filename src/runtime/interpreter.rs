//! Script interpreter
//!
//! Executes a lowered [`Script`] with the semantics of the emitted text
//! running inside the execution wrapper: hoisted `var` bindings, loose
//! comparisons, numeric coercion, captured `console.log` output and an
//! awaited `delay` helper.
//!
//! Execution is iterative; nested branches are frames on an explicit stack,
//! so the only suspension points are delays.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::value::Value;
use crate::categories::logic::ComparisonOp;
use crate::categories::transform::TransformOp;
use crate::codegen::script::{Expr, Script, Statement, Token};
use crate::codegen::wrapper::is_helper_name;

/// Words the host refuses as identifiers inside the wrapper's async function
pub const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with",
];

// ── Errors ──────────────────────────────────────────────────────────────────

/// Errors raised while the program runs; caught by the wrapper
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgramError {
    #[error("{0} is not defined")]
    NotDefined(String),

    #[error("{receiver}.{method} is not a function")]
    NotAFunction { receiver: String, method: String },

    #[error("Cannot read properties of undefined (reading '{0}')")]
    ReadOfUndefined(String),

    #[error("Cannot read properties of null (reading '{0}')")]
    ReadOfNull(String),

    #[error("Assignment to constant variable.")]
    ConstantAssignment,
}

/// Errors the host reports before running anything
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("Invalid or unexpected token")]
    InvalidToken,

    #[error("Identifier '{0}' has already been declared")]
    AlreadyDeclared(String),

    #[error("Invalid left-hand side in assignment")]
    InvalidAssignmentTarget,

    #[error("Invalid left-hand side expression in postfix operation")]
    InvalidPostfixTarget,
}

/// Reserved words that are values when read. `this` reads as undefined
/// inside the wrapper.
pub fn literal_word(name: &str) -> Option<Value> {
    match name {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        "this" => Some(Value::Undefined),
        _ => None,
    }
}

/// Check a script the way the host parses the wrapped text, reporting the
/// first problem in source order.
pub fn check_syntax(script: &Script) -> Result<(), SyntaxError> {
    for token in script.tokens() {
        match token {
            Token::Declare(name) => {
                check_identifier(name)?;
                if is_helper_name(name) {
                    return Err(SyntaxError::AlreadyDeclared(name.to_string()));
                }
            }
            Token::Reference(name) if literal_word(name).is_some() => {}
            Token::Reference(name) => check_identifier(name)?,
            Token::Target { name, postfix } => {
                if literal_word(name).is_some() {
                    return Err(if postfix {
                        SyntaxError::InvalidPostfixTarget
                    } else {
                        SyntaxError::InvalidAssignmentTarget
                    });
                }
                check_identifier(name)?;
            }
            Token::Text(text) => {
                // Raw line breaks end a string literal early
                if text.contains(['\n', '\r']) {
                    return Err(SyntaxError::InvalidToken);
                }
            }
        }
    }
    Ok(())
}

fn check_identifier(name: &str) -> Result<(), SyntaxError> {
    if RESERVED_WORDS.contains(&name) {
        return Err(SyntaxError::UnexpectedToken(name.to_string()));
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(SyntaxError::InvalidToken);
    }
    Ok(())
}

// ── Host capabilities ───────────────────────────────────────────────────────

/// Suspends the program for a `delay` call.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer; honours paused time in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Captured program output, shared with whoever is waiting on the run.
///
/// Every line is also forwarded to `tracing` under `block_flow::console`.
#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: String) {
        info!(target: "block_flow::console", "{line}");
        self.lines.lock().push(line);
    }

    /// Lines captured so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

// ── Interpreter ─────────────────────────────────────────────────────────────

/// Runs one script. Bindings live for the lifetime of the interpreter.
pub struct Interpreter {
    sink: OutputSink,
    sleeper: Arc<dyn Sleeper>,
    bindings: HashMap<String, Value>,
}

impl Interpreter {
    pub fn new(sink: OutputSink, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            sink,
            sleeper,
            bindings: HashMap::new(),
        }
    }

    /// Execute a script to completion or to its first error.
    ///
    /// Output printed before an error stays in the sink.
    pub async fn execute(&mut self, script: &Script) -> Result<(), ProgramError> {
        self.hoist(script);

        let mut frames: Vec<std::slice::Iter<'_, Statement>> = vec![script.statements.iter()];
        while let Some(frame) = frames.last_mut() {
            let Some(statement) = frame.next() else {
                frames.pop();
                continue;
            };

            match statement {
                Statement::Assign { name, value } => {
                    let value = self.eval(value)?;
                    debug!(%name, %value, "assign");
                    self.bindings.insert(name.clone(), value);
                }
                Statement::If {
                    subject,
                    op,
                    compare,
                    then_branch,
                    else_branch,
                } => {
                    let left = self.lookup(subject)?;
                    let right = self.eval(compare)?;
                    let taken = holds(*op, &left, &right);
                    debug!(%subject, op = op.symbol(), taken, "condition");
                    frames.push(if taken { then_branch.iter() } else { else_branch.iter() });
                }
                Statement::Transform { target, op } => {
                    let value = self.transform(target, *op)?;
                    debug!(%target, op = op.code(), %value, "transform");
                    // Writes to the read-only globals are silently dropped
                    if let Some(slot) = self.bindings.get_mut(target) {
                        *slot = value;
                    }
                }
                Statement::Delay { seconds } => {
                    let duration = delay_duration(*seconds);
                    debug!(?duration, "delay");
                    self.sleeper.sleep(duration).await;
                }
                Statement::Print { message } => {
                    let value = self.eval(message)?;
                    self.sink.push(value.to_string());
                }
                Statement::Evaluate(expr) => {
                    self.eval(expr)?;
                }
            }
        }
        Ok(())
    }

    /// Current value of a binding, if the program declared it
    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Every declared name exists from the start, holding undefined
    fn hoist(&mut self, script: &Script) {
        let declared: HashSet<&str> = script.declared_names().into_iter().collect();
        for name in declared {
            self.bindings
                .entry(name.to_string())
                .or_insert(Value::Undefined);
        }
    }

    fn lookup(&self, name: &str) -> Result<Value, ProgramError> {
        if let Some(value) = literal_word(name) {
            return Ok(value);
        }
        if let Some(value) = self.bindings.get(name) {
            return Ok(value.clone());
        }
        match name {
            "undefined" => Ok(Value::Undefined),
            "NaN" => Ok(Value::Number(f64::NAN)),
            "Infinity" => Ok(Value::Number(f64::INFINITY)),
            // The wrapper's own helpers are not script values
            _ if is_helper_name(name) => Ok(Value::Undefined),
            _ => Err(ProgramError::NotDefined(name.to_string())),
        }
    }

    fn eval(&self, expr: &Expr) -> Result<Value, ProgramError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Text(s) => Ok(Value::Text(s.clone())),
            Expr::Variable(name) => self.lookup(name),
        }
    }

    fn transform(&self, target: &str, op: TransformOp) -> Result<Value, ProgramError> {
        let current = self.lookup(target)?;
        let helper = is_helper_name(target);

        let number = |f: fn(f64) -> f64| {
            if helper {
                Err(ProgramError::ConstantAssignment)
            } else {
                Ok(Value::Number(f(current.to_number())))
            }
        };
        let text = |method: &str, f: fn(&str) -> String| match &current {
            _ if helper => Err(ProgramError::NotAFunction {
                receiver: target.to_string(),
                method: method.to_string(),
            }),
            Value::Text(s) => Ok(Value::Text(f(s))),
            Value::Number(_) | Value::Bool(_) => Err(ProgramError::NotAFunction {
                receiver: target.to_string(),
                method: method.to_string(),
            }),
            Value::Undefined => Err(ProgramError::ReadOfUndefined(method.to_string())),
            Value::Null => Err(ProgramError::ReadOfNull(method.to_string())),
        };

        match op {
            TransformOp::Multiply2 => number(|n| n * 2.0),
            TransformOp::Multiply10 => number(|n| n * 10.0),
            TransformOp::Divide2 => number(|n| n / 2.0),
            TransformOp::Add1 => number(|n| n + 1.0),
            TransformOp::Sub1 => number(|n| n - 1.0),
            TransformOp::Uppercase => text("toUpperCase", str::to_uppercase),
            TransformOp::Lowercase => text("toLowerCase", str::to_lowercase),
            TransformOp::Reverse => text("split", |s| s.chars().rev().collect()),
        }
    }
}

fn holds(op: ComparisonOp, left: &Value, right: &Value) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};

    match op {
        ComparisonOp::Eq => left.loose_eq(right),
        ComparisonOp::Neq => !left.loose_eq(right),
        ComparisonOp::Gt => left.compare(right) == Some(Greater),
        ComparisonOp::Lt => left.compare(right) == Some(Less),
        ComparisonOp::Gte => matches!(left.compare(right), Some(Greater | Equal)),
        ComparisonOp::Lte => matches!(left.compare(right), Some(Less | Equal)),
    }
}

/// Timer duration for `delay(seconds)`; negative and NaN wait zero
fn delay_duration(seconds: f64) -> Duration {
    let ms = seconds * 1000.0;
    if !(ms > 0.0) {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::{Node, Workspace};

    fn script(chain: Vec<Node>) -> Script {
        Script::lower(&Workspace::new().with_block(Node::trigger().then(chain))).unwrap()
    }

    async fn run(chain: Vec<Node>) -> (Result<(), ProgramError>, Vec<String>) {
        let sink = OutputSink::new();
        let mut interpreter = Interpreter::new(sink.clone(), Arc::new(TokioSleeper));
        let result = interpreter.execute(&script(chain)).await;
        (result, sink.lines())
    }

    #[tokio::test]
    async fn test_assign_and_print() {
        let (result, lines) = run(vec![
            Node::set_variable("x", Node::number(5.0)),
            Node::output(Node::variable("x")),
        ])
        .await;
        assert_eq!(result, Ok(()));
        assert_eq!(lines, vec!["5"]);
    }

    #[tokio::test]
    async fn test_hoisted_variable_reads_undefined() {
        let (result, lines) = run(vec![
            Node::output(Node::variable("later")),
            Node::set_variable("later", Node::text("now")),
            Node::output(Node::variable("later")),
        ])
        .await;
        assert_eq!(result, Ok(()));
        assert_eq!(lines, vec!["undefined", "now"]);
    }

    #[tokio::test]
    async fn test_undeclared_variable_keeps_earlier_output() {
        let (result, lines) = run(vec![
            Node::output(Node::text("before")),
            Node::output(Node::variable("ghost")),
            Node::output(Node::text("after")),
        ])
        .await;
        assert_eq!(result, Err(ProgramError::NotDefined("ghost".into())));
        assert_eq!(result.unwrap_err().to_string(), "ghost is not defined");
        assert_eq!(lines, vec!["before"]);
    }

    #[tokio::test]
    async fn test_branches() {
        let (_, lines) = run(vec![
            Node::set_variable("score", Node::text("12")),
            Node::condition("score", "GTE", Node::number(10.0))
                .when_true(vec![Node::output(Node::text("high"))])
                .otherwise(vec![Node::output(Node::text("low"))]),
            Node::condition("score", "EQ", Node::number(12.0))
                .when_true(vec![Node::output(Node::text("exact"))]),
        ])
        .await;
        assert_eq!(lines, vec!["high", "exact"]);
    }

    #[tokio::test]
    async fn test_arithmetic_transforms_coerce() {
        let (_, lines) = run(vec![
            Node::set_variable("n", Node::text("4")),
            Node::transform("n", "MULTIPLY_10"),
            Node::transform("n", "DIVIDE_2"),
            Node::transform("n", "SUB_1"),
            Node::output(Node::variable("n")),
            Node::set_variable("word", Node::text("abc")),
            Node::transform("word", "ADD_1"),
            Node::output(Node::variable("word")),
        ])
        .await;
        assert_eq!(lines, vec!["19", "NaN"]);
    }

    #[tokio::test]
    async fn test_text_transforms() {
        let (_, lines) = run(vec![
            Node::set_variable("s", Node::text("Hello")),
            Node::transform("s", "UPPERCASE"),
            Node::output(Node::variable("s")),
            Node::transform("s", "REVERSE"),
            Node::output(Node::variable("s")),
        ])
        .await;
        assert_eq!(lines, vec!["HELLO", "OLLEH"]);
    }

    #[tokio::test]
    async fn test_text_transform_type_errors() {
        let (result, _) = run(vec![
            Node::set_variable("n", Node::number(3.0)),
            Node::transform("n", "LOWERCASE"),
        ])
        .await;
        assert_eq!(result.unwrap_err().to_string(), "n.toLowerCase is not a function");

        let (result, _) = run(vec![
            Node::transform("u", "REVERSE"),
            Node::set_variable("u", Node::number(1.0)),
        ])
        .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Cannot read properties of undefined (reading 'split')"
        );
    }

    #[tokio::test]
    async fn test_builtin_globals() {
        let (result, lines) = run(vec![
            Node::output(Node::variable("NaN")),
            Node::output(Node::variable("Infinity")),
            Node::output(Node::variable("undefined")),
        ])
        .await;
        assert_eq!(result, Ok(()));
        assert_eq!(lines, vec!["NaN", "Infinity", "undefined"]);
    }

    #[tokio::test]
    async fn test_literal_words_read_as_values() {
        let (result, lines) = run(vec![
            Node::output(Node::variable("true")),
            Node::set_variable("n", Node::variable("null")),
            Node::output(Node::variable("n")),
            Node::condition("true", "GT", Node::number(5.0))
                .when_true(vec![Node::output(Node::text("big"))])
                .otherwise(vec![Node::output(Node::variable("false"))]),
            Node::output(Node::variable("this")),
        ])
        .await;
        assert_eq!(result, Ok(()));
        assert_eq!(lines, vec!["true", "null", "false", "undefined"]);
    }

    #[tokio::test]
    async fn test_text_transform_on_null() {
        let (result, _) = run(vec![
            Node::set_variable("n", Node::variable("null")),
            Node::transform("n", "UPPERCASE"),
        ])
        .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Cannot read properties of null (reading 'toUpperCase')"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_suspends() {
        let start = tokio::time::Instant::now();
        let (result, _) = run(vec![Node::delay(2.5)]).await;
        assert_eq!(result, Ok(()));
        assert!(start.elapsed() >= Duration::from_millis(2500));
    }

    #[test]
    fn test_delay_duration_edges() {
        assert_eq!(delay_duration(-1.0), Duration::ZERO);
        assert_eq!(delay_duration(f64::NAN), Duration::ZERO);
        assert_eq!(delay_duration(0.5), Duration::from_millis(500));
        assert_eq!(delay_duration(f64::INFINITY), Duration::MAX);
    }

    #[test]
    fn test_syntax_reserved_word() {
        let s = script(vec![Node::set_variable("class", Node::number(1.0))]);
        assert_eq!(
            check_syntax(&s),
            Err(SyntaxError::UnexpectedToken("class".into()))
        );
    }

    #[test]
    fn test_syntax_literal_words() {
        let s = script(vec![
            Node::output(Node::variable("true")),
            Node::condition("null", "EQ", Node::variable("false")),
        ]);
        assert_eq!(check_syntax(&s), Ok(()));

        let s = script(vec![Node::set_variable("true", Node::number(1.0))]);
        assert_eq!(check_syntax(&s), Err(SyntaxError::UnexpectedToken("true".into())));

        let s = script(vec![Node::transform("null", "MULTIPLY_2")]);
        assert_eq!(
            check_syntax(&s).unwrap_err().to_string(),
            "Invalid left-hand side in assignment"
        );
        let s = script(vec![Node::transform("this", "ADD_1")]);
        assert_eq!(check_syntax(&s), Err(SyntaxError::InvalidPostfixTarget));
        let s = script(vec![Node::transform("class", "ADD_1")]);
        assert_eq!(check_syntax(&s), Err(SyntaxError::UnexpectedToken("class".into())));
    }

    #[test]
    fn test_syntax_leading_digit_and_line_break() {
        let s = script(vec![Node::output(Node::variable("1st"))]);
        assert_eq!(check_syntax(&s), Err(SyntaxError::InvalidToken));
        let s = script(vec![Node::output(Node::text("two\nlines"))]);
        assert_eq!(check_syntax(&s), Err(SyntaxError::InvalidToken));
    }

    #[test]
    fn test_syntax_helper_redeclaration() {
        let s = script(vec![Node::set_variable("delay", Node::number(1.0))]);
        assert_eq!(
            check_syntax(&s).unwrap_err().to_string(),
            "Identifier 'delay' has already been declared"
        );
        let s = script(vec![Node::output(Node::variable("output"))]);
        assert_eq!(check_syntax(&s), Ok(()));
    }

    #[test]
    fn test_syntax_reports_first_problem() {
        let s = script(vec![
            Node::set_variable("x", Node::variable("2x")),
            Node::set_variable("if", Node::number(1.0)),
        ]);
        assert_eq!(check_syntax(&s), Err(SyntaxError::InvalidToken));
    }
}
