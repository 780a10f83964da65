//! WASM API: `#[wasm_bindgen]` exports for the browser editor.
//!
//! Only compiled when targeting `wasm32`. The host owns the visual editing
//! surface and executes the wrapped program itself; this module provides:
//! - `init_editor`: lifecycle
//! - `get_block_definitions` / `get_toolbox`: catalog discovery
//! - `set_workspace` / `clear_workspace`: workspace edits
//! - `generate_code`: validation and code generation
//! - `render_run_result` / `render_execution_error`: output panel text
//! - `save_workflow` / `load_workflow` / `restore_autosave`: persistence
//!
//! Every function returns a JSON string.

use std::cell::RefCell;

use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::categories::toolbox::Toolbox;
use crate::config::EditorConfig;
use crate::core::node::Workspace;
use crate::editor::{EditorSession, Notification};
use crate::runtime::engine::ExecutionRecord;
use crate::runtime::validation::Diagnostic;
use crate::storage::BrowserStorage;

// ── Global state ────────────────────────────────────────────────────────────

thread_local! {
    static EDITOR: RefCell<Option<EditorSession>> = RefCell::new(None);
}

fn with_editor<R>(f: impl FnOnce(&mut EditorSession) -> R) -> Result<R, String> {
    EDITOR.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(editor) => Ok(f(editor)),
            None => Err("Editor not initialized. Call init_editor() first.".into()),
        }
    })
}

// ── Response types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct ActionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<Notification>,
    #[serde(rename = "codePanel")]
    code_panel: String,
    #[serde(rename = "outputPanel")]
    output_panel: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    notification: Notification,
    #[serde(rename = "codePanel")]
    code_panel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    executable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostic: Option<Diagnostic>,
}

#[derive(Serialize)]
struct LoadResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<Notification>,
    workspace: Workspace,
}

#[derive(Serialize)]
struct RestoreResponse {
    restored: bool,
    workspace: Workspace,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn json_err(msg: impl Into<String>) -> String {
    to_json(&ErrorResponse { error: msg.into() })
}

fn respond<T: Serialize>(result: Result<T, String>) -> String {
    match result {
        Ok(value) => to_json(&value),
        Err(e) => json_err(e),
    }
}

fn panels(editor: &EditorSession, notification: Option<Notification>) -> ActionResponse {
    ActionResponse {
        notification,
        code_panel: editor.code_panel().to_string(),
        output_panel: editor.output_panel().to_string(),
    }
}

/// Ask the page through `window.confirm`. A page without one counts as yes.
fn host_confirm(prompt: &str) -> bool {
    let confirm = Reflect::get(&js_sys::global(), &JsValue::from_str("confirm"))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok());
    match confirm {
        Some(confirm) => confirm
            .call1(&JsValue::NULL, &JsValue::from_str(prompt))
            .map(|answer| answer.is_truthy())
            .unwrap_or(false),
        None => true,
    }
}

// ── Exported functions ──────────────────────────────────────────────────────

/// Create the editor session. `config_json` may be empty for defaults.
#[wasm_bindgen]
pub fn init_editor(config_json: &str) -> String {
    console_error_panic_hook::set_once();

    let config = if config_json.trim().is_empty() {
        EditorConfig::default()
    } else {
        match EditorConfig::from_json(config_json) {
            Ok(config) => config,
            Err(e) => return json_err(e.to_string()),
        }
    };

    EDITOR.with(|cell| {
        let editor = EditorSession::new(config, Box::new(BrowserStorage::new()));
        let response = panels(&editor, None);
        *cell.borrow_mut() = Some(editor);
        to_json(&response)
    })
}

#[wasm_bindgen]
pub fn get_block_definitions() -> String {
    respond(with_editor(|editor| editor.catalog().to_editor_json()))
}

#[wasm_bindgen]
pub fn get_toolbox() -> String {
    to_json(&Toolbox::standard().to_editor_json())
}

#[wasm_bindgen]
pub fn set_workspace(workspace_json: &str) -> String {
    let workspace = match Workspace::from_json(workspace_json) {
        Ok(workspace) => workspace,
        Err(e) => return json_err(format!("Invalid workspace JSON: {e}")),
    };
    respond(with_editor(|editor| {
        editor.set_workspace(workspace);
        editor.workspace().clone()
    }))
}

#[wasm_bindgen]
pub fn generate_code() -> String {
    respond(with_editor(|editor| {
        let notification = editor.generate();
        GenerateResponse {
            notification,
            code_panel: editor.code_panel().to_string(),
            display: editor.program().map(|p| p.display.clone()),
            executable: editor.program().map(|p| p.executable.clone()),
            diagnostic: editor.diagnostic().cloned(),
        }
    }))
}

/// Format the output panel for the record returned by the wrapped program
#[wasm_bindgen]
pub fn render_run_result(record_json: &str) -> String {
    let record: ExecutionRecord = match serde_json::from_str(record_json) {
        Ok(record) => record,
        Err(e) => return json_err(format!("Invalid execution record: {e}")),
    };
    respond(with_editor(|editor| {
        let notification = editor.show_record(&record);
        panels(editor, Some(notification))
    }))
}

/// Format the output panel for an error thrown outside the wrapper
#[wasm_bindgen]
pub fn render_execution_error(message: &str) -> String {
    respond(with_editor(|editor| {
        let notification = editor.show_execution_error(message);
        panels(editor, Some(notification))
    }))
}

#[wasm_bindgen]
pub fn clear_workspace(confirmed: bool) -> String {
    respond(with_editor(|editor| {
        let notification = editor.clear(confirmed);
        panels(editor, notification)
    }))
}

#[wasm_bindgen]
pub fn save_workflow() -> String {
    respond(with_editor(|editor| {
        let notification = editor.save();
        panels(editor, Some(notification))
    }))
}

#[wasm_bindgen]
pub fn load_workflow() -> String {
    respond(with_editor(|editor| {
        let notification = editor.load(host_confirm);
        LoadResponse {
            notification,
            workspace: editor.workspace().clone(),
        }
    }))
}

#[wasm_bindgen]
pub fn restore_autosave() -> String {
    respond(with_editor(|editor| RestoreResponse {
        restored: editor.restore_autosave(),
        workspace: editor.workspace().clone(),
    }))
}
