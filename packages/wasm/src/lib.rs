use mailforge_editor::{Command, DropTarget, EditorState, PaletteItem};
use mailforge_render::{render_document, render_request, CustomBlockRegistry, RenderOptions};
use mailforge_schema::{parse_str, validate};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, err: impl Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn to_json(value: &impl Serialize) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

#[derive(Serialize)]
struct SafeValidation {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<mailforge_schema::Document>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<mailforge_schema::FieldError>,
}

/// Validate a document, returning it normalized as JSON
#[wasm_bindgen(js_name = validateDocument)]
pub fn validate_document_js(json: &str) -> Result<String, JsValue> {
    let doc = parse_str(json).map_err(|e| js_error("Invalid document", e))?;
    to_json(&doc)
}

/// Validate a document without failing; answers `{ success, data?, errors? }`
#[wasm_bindgen(js_name = safeValidateDocument)]
pub fn safe_validate_document_js(json: &str) -> Result<String, JsValue> {
    let value: Value = serde_json::from_str(json).map_err(|e| js_error("Parse error", e))?;
    let result = match validate(&value) {
        Ok(doc) => SafeValidation {
            success: true,
            data: Some(doc),
            errors: Vec::new(),
        },
        Err(invalid) => SafeValidation {
            success: false,
            data: None,
            errors: invalid.errors,
        },
    };
    to_json(&result)
}

/// Render a `{ document, options }` request; custom blocks render as
/// placeholders or fail, since components cannot cross the boundary
#[wasm_bindgen(js_name = renderDocument)]
pub fn render_document_js(request: &str) -> Result<String, JsValue> {
    render_request(request, &CustomBlockRegistry::new()).map_err(|e| js_error("Render error", e))
}

/// An editing session: one document with its undo history
#[wasm_bindgen]
pub struct WasmEditor {
    state: EditorState,
}

#[wasm_bindgen]
impl WasmEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str, max_levels: Option<usize>) -> Result<WasmEditor, JsValue> {
        let doc = parse_str(json).map_err(|e| js_error("Invalid document", e))?;
        let state = match max_levels {
            Some(levels) => EditorState::with_max_levels(doc, levels),
            None => EditorState::new(doc),
        };
        Ok(WasmEditor { state })
    }

    /// Current document as JSON
    pub fn document(&self) -> Result<String, JsValue> {
        to_json(self.state.document())
    }

    /// Apply a serialized command; `false` when it changed nothing
    pub fn apply(&mut self, command: &str) -> Result<bool, JsValue> {
        let command: Command = serde_json::from_str(command).map_err(|e| js_error("Invalid command", e))?;
        Ok(self.state.apply(&command))
    }

    #[wasm_bindgen(js_name = dropItem)]
    pub fn drop_item(&mut self, item: &str, target: &str) -> Result<bool, JsValue> {
        let item: PaletteItem = serde_json::from_str(item).map_err(|e| js_error("Invalid palette item", e))?;
        let target: DropTarget = serde_json::from_str(target).map_err(|e| js_error("Invalid drop target", e))?;
        self.state
            .drop_item(&item, &target)
            .map_err(|e| js_error("Drop rejected", e))
    }

    #[wasm_bindgen(js_name = changeColumnCount)]
    pub fn change_column_count(&mut self, row_id: &str, count: usize) -> Result<bool, JsValue> {
        self.state
            .change_column_count(row_id, count)
            .map_err(|e| js_error("Drop rejected", e))
    }

    /// Copy a block next to itself, returning the copy's id
    #[wasm_bindgen(js_name = duplicateBlock)]
    pub fn duplicate_block(&mut self, block_id: &str) -> Option<String> {
        self.state.duplicate_block(block_id)
    }

    pub fn undo(&mut self) -> bool {
        self.state.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.state.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.state.history().can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.state.history().can_redo()
    }

    /// Mark the current document as saved; `false` if it already was
    pub fn save(&mut self) -> bool {
        self.state.save()
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Render the current document with serialized render options
    pub fn render(&self, options: &str) -> Result<String, JsValue> {
        let options: RenderOptions = serde_json::from_str(options).map_err(|e| js_error("Invalid options", e))?;
        let output = render_document(self.state.document(), &options, &CustomBlockRegistry::new())
            .map_err(|e| js_error("Render error", e))?;
        to_json(&output)
    }
}
