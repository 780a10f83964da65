//! Text shown in the code and output panels

use crate::runtime::engine::{ExecutionRecord, RunReport};
use crate::runtime::hints::hint_suffix;

pub const CODE_PLACEHOLDER: &str =
    "// Your generated code will appear here...\n// Drag blocks from the toolbox to create your workflow!";

pub const OUTPUT_PLACEHOLDER: &str =
    "✨ Ready to execute...\n\nDrag blocks to the workspace, click Generate, then Run!";

pub const NO_CODE: &str = "❌ No code to execute\n\nSteps:\n1. Add blocks to workspace\n2. Click \"Generate Code\"\n3. Click \"Run\"";

pub const EXECUTING_BANNER: &str = "🚀 Executing workflow...\n\n";

const NO_OUTPUT: &str = "⚠️ No output generated\n";
const COMPLETED: &str = "\n✅ Workflow completed successfully!";
const GENERIC_TIP: &str = "\n\n💡 Tip: Check your variable names and block connections";

/// Escape text for HTML display, as a DOM text node serializes it
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Code panel for a generated program
pub fn code_view(display: &str) -> String {
    escape_html(display)
}

pub fn generation_error(message: &str) -> String {
    format!("// Generation Error: {}", escape_html(message))
}

/// Output panel for a record returned by the execution wrapper
pub fn render_record(record: &ExecutionRecord) -> String {
    let mut panel = if record.output.is_empty() {
        NO_OUTPUT.to_string()
    } else {
        format!("{}\n", record.output.join("\n"))
    };

    if record.success {
        panel.push_str(COMPLETED);
    } else {
        let error = record.error.as_deref().unwrap_or("undefined");
        panel.push_str(&format!("\n❌ Runtime Error: {error}"));
        panel.push_str(GENERIC_TIP);
        panel.push_str(&hint_suffix(error));
    }
    panel
}

/// Output panel for a run that never produced a record
pub fn render_execution_error(message: &str) -> String {
    format!(
        "{EXECUTING_BANNER}\n\n❌ Execution Error: {message}{}",
        hint_suffix(message)
    )
}

pub fn render_report(report: &RunReport) -> String {
    match &report.outcome {
        Ok(record) => render_record(record),
        Err(e) => render_execution_error(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("if (a < b && c > d) \"q\"\u{00A0}"),
            "if (a &lt; b &amp;&amp; c &gt; d) \"q\"&nbsp;"
        );
    }

    #[test]
    fn test_successful_record() {
        let record = ExecutionRecord::completed(vec!["5".into(), "done".into()]);
        assert_eq!(
            render_record(&record),
            "5\ndone\n\n✅ Workflow completed successfully!"
        );
    }

    #[test]
    fn test_empty_successful_record() {
        assert_eq!(
            render_record(&ExecutionRecord::completed(vec![])),
            "⚠️ No output generated\n\n✅ Workflow completed successfully!"
        );
    }

    #[test]
    fn test_failed_record_with_hint() {
        let record = ExecutionRecord::failed(vec!["a".into()], "total is not defined");
        assert_eq!(
            render_record(&record),
            "a\n\n❌ Runtime Error: total is not defined\
             \n\n💡 Tip: Check your variable names and block connections\
             \n\n💡 Tip: Variable \"total\" is used before being set. Add a \"Set Variable\" block first."
        );
    }

    #[test]
    fn test_execution_error() {
        assert_eq!(
            render_execution_error("Execution timeout (30s limit)"),
            "🚀 Executing workflow...\n\n\n\n❌ Execution Error: Execution timeout (30s limit)\
             \n\n💡 Tip: Workflow took too long. Check for infinite loops or reduce delay times."
        );
    }
}
