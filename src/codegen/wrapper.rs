//! Execution wrapper for script hosts
//!
//! The display text is not runnable on its own: it calls `delay` and expects
//! its `console.log` calls to be captured. The wrapper supplies both and turns
//! the outcome into a `{ success, output, error }` record. It is meant to be
//! used as the body of an async function.

/// Names the wrapper declares; generated code must not redeclare them
pub const HELPER_NAMES: [&str; 3] = ["output", "_log", "delay"];

const PREAMBLE: &str = r#"
const output = [];
const _log = console.log;
console.log = (...args) => {
  const msg = args.map(a => typeof a === 'object' ? JSON.stringify(a) : String(a)).join(' ');
  output.push(msg);
  _log(...args);
};
const delay = (s) => new Promise(r => setTimeout(r, s * 1000));

try {
"#;

const POSTAMBLE: &str = r#"
  console.log = _log;
  return { success: true, output };
} catch (e) {
  console.log = _log;
  return { success: false, output, error: e.message };
}"#;

/// Wrap display text into its executable form
pub fn wrap(display: &str) -> String {
    let mut out = String::with_capacity(PREAMBLE.len() + display.len() + POSTAMBLE.len());
    out.push_str(PREAMBLE);
    out.push_str(display);
    out.push_str(POSTAMBLE);
    out
}

pub fn is_helper_name(name: &str) -> bool {
    HELPER_NAMES.contains(&name)
}
