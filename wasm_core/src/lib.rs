use std::rc::Rc;

use console_error_panic_hook::set_once as set_panic_hook;
use js_sys::Promise;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub mod ai;
pub mod bst;
pub mod catalogue;
pub mod context;
pub mod draw;
pub mod export;
pub mod flatten;
pub mod morse;
pub mod router;
pub mod storage;
pub mod telemetry;

use ai::{AiTool, GenerativeWidget, HttpTransport, InlineImage, ServiceConfig, ToolMode};
use bst::{NodeLayout, SearchTree};
use catalogue::{Engine, TOOLS, ToolDoc, ToolEntry, find_tool};
use context::{AppContext, Locale};
use draw::{DrawRng, PickerConfig, SpinWheel, WheelConfig, WinnerPicker, parse_candidates};
use export::ExportFile;
#[cfg(target_arch = "wasm32")]
use storage::BrowserStore;
use storage::{InvoiceLedger, KeyValueStore, MemoryStore, Notepad};

/// Shown in place of a result when the input cannot be parsed.
pub const INVALID_INPUT: &str = "Invalid input";

thread_local! {
    static APP: AppContext = AppContext::init(open_store());
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    set_panic_hook();
    telemetry::init("info");
}

#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    telemetry::init(level);
}

fn open_store() -> Rc<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        match BrowserStore::open() {
            Ok(store) => return Rc::new(store),
            Err(err) => tracing::warn!(%err, "falling back to in-memory storage"),
        }
    }
    Rc::new(MemoryStore::new())
}

fn shared_store() -> Rc<dyn KeyValueStore> {
    APP.with(|app| app.store())
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn js_error(err: impl ToString) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn config_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

fn or_placeholder(result: Result<String, String>) -> String {
    result.unwrap_or_else(|err| {
        debug!(%err, "input rejected");
        INVALID_INPUT.to_string()
    })
}

// Routing and catalogue

#[wasm_bindgen]
pub fn resolve_route(hash: &str) -> Result<JsValue, JsValue> {
    to_js(&router::parse_location(hash).view())
}

#[wasm_bindgen]
pub fn list_tools(query: &str) -> Result<JsValue, JsValue> {
    to_js(&list_tools_internal(query))
}

fn list_tools_internal(query: &str) -> Vec<&'static ToolEntry> {
    if query.trim().is_empty() {
        TOOLS.iter().collect()
    } else {
        catalogue::search(query)
    }
}

#[wasm_bindgen]
pub fn list_categories() -> Result<JsValue, JsValue> {
    to_js(&catalogue::category_summaries())
}

#[wasm_bindgen]
pub fn tool_doc(id: &str) -> Result<JsValue, JsValue> {
    let locale = APP.with(|app| app.locale());
    tool_doc_internal(id, locale)
        .map_err(|err| JsValue::from_str(&err))
        .and_then(|doc| to_js(&doc))
}

fn tool_doc_internal(id: &str, locale: Locale) -> Result<ToolDoc, String> {
    find_tool(id)
        .map(|tool| ToolDoc::resolve(tool, locale))
        .ok_or_else(|| format!("unknown tool {id}"))
}

#[wasm_bindgen]
pub fn current_locale() -> String {
    APP.with(|app| app.locale().tag().to_string())
}

#[wasm_bindgen]
pub fn set_locale(tag: &str) -> Result<(), JsValue> {
    let locale =
        Locale::parse(tag).ok_or_else(|| js_error(format!("unsupported language {tag}")))?;
    APP.with(|app| app.set_locale(locale)).map_err(js_error)
}

// Draw widgets

#[wasm_bindgen]
pub fn parse_candidate_text(text: &str, dedupe: bool) -> Result<JsValue, JsValue> {
    to_js(parse_candidates(text, dedupe).as_slice())
}

#[wasm_bindgen]
pub struct WinnerPickerHandle {
    picker: WinnerPicker,
    rng: DrawRng,
}

#[wasm_bindgen]
impl WinnerPickerHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str, config: JsValue) -> Result<WinnerPickerHandle, JsValue> {
        let config: PickerConfig = config_or_default(config)?;
        let rng = DrawRng::from_entropy().map_err(js_error)?;
        Ok(Self {
            picker: WinnerPicker::with_config(parse_candidates(text, false), config),
            rng,
        })
    }

    pub fn set_candidates(&mut self, text: &str, dedupe: bool) {
        self.picker.edit_text(text, dedupe);
    }

    pub fn candidates(&self) -> Result<JsValue, JsValue> {
        to_js(self.picker.candidates().as_slice())
    }

    pub fn can_start(&self) -> bool {
        self.picker.can_start()
    }

    pub fn start(&mut self, now_ms: f64) -> bool {
        self.picker.start(now_ms, &mut self.rng)
    }

    pub fn frame(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.picker.frame(now_ms))
    }

    pub fn dismiss(&mut self) {
        self.picker.dismiss();
    }

    pub fn remove_winner(&mut self) -> Option<String> {
        self.picker.remove_winner()
    }

    pub fn history(&self) -> Result<JsValue, JsValue> {
        to_js(self.picker.history())
    }
}

#[wasm_bindgen]
pub struct SpinWheelHandle {
    wheel: SpinWheel,
    rng: DrawRng,
}

#[wasm_bindgen]
impl SpinWheelHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str, config: JsValue) -> Result<SpinWheelHandle, JsValue> {
        let config: WheelConfig = config_or_default(config)?;
        let rng = DrawRng::from_entropy().map_err(js_error)?;
        Ok(Self {
            wheel: SpinWheel::with_config(parse_candidates(text, false), config),
            rng,
        })
    }

    /// Cancels a spin in progress, leaving the wheel at its current angle.
    pub fn set_candidates(&mut self, text: &str, dedupe: bool, now_ms: f64) {
        self.wheel.edit_text(text, dedupe, now_ms);
    }

    pub fn candidates(&self) -> Result<JsValue, JsValue> {
        to_js(self.wheel.candidates().as_slice())
    }

    pub fn can_start(&self) -> bool {
        self.wheel.can_start()
    }

    pub fn start(&mut self, now_ms: f64) -> bool {
        self.wheel.start(now_ms, &mut self.rng)
    }

    pub fn frame(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.wheel.frame(now_ms))
    }

    pub fn rotation(&self) -> f64 {
        self.wheel.rotation()
    }

    /// `[start, end)` angles of slice `index`, for drawing.
    pub fn slice_bounds(&self, index: usize) -> Vec<f64> {
        let (start, end) = draw::wheel::slice_bounds(index, self.wheel.candidates().len());
        vec![start, end]
    }

    pub fn dismiss(&mut self) {
        self.wheel.dismiss();
    }
}

// Generative tools

#[wasm_bindgen]
pub struct AiToolHandle {
    widget: GenerativeWidget<HttpTransport>,
}

fn generative_tool(id: &str) -> Result<AiTool, String> {
    match find_tool(id).map(|tool| tool.engine) {
        Some(Engine::Generative(tool)) => Ok(tool),
        Some(_) => Err(format!("{id} is not an AI tool")),
        None => Err(format!("unknown tool {id}")),
    }
}

#[wasm_bindgen]
impl AiToolHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(tool_id: &str, config: JsValue) -> Result<AiToolHandle, JsValue> {
        let tool = generative_tool(tool_id).map_err(|err| JsValue::from_str(&err))?;
        let config: ServiceConfig = config_or_default(config)?;
        let model = config.model.clone();
        let transport = HttpTransport::new(config).map_err(|err| JsValue::from_str(&err))?;
        Ok(Self {
            widget: GenerativeWidget::with_model(tool, Rc::new(transport), &model),
        })
    }

    pub fn modes(&self) -> Result<JsValue, JsValue> {
        to_js(self.widget.tool().modes())
    }

    pub fn accepts_image(&self) -> bool {
        self.widget.tool().accepts_image()
    }

    pub fn set_input(&self, input: &str) {
        self.widget.set_input(input);
    }

    pub fn set_mode(&self, mode: Option<String>) -> Result<(), JsValue> {
        let mode = mode
            .as_deref()
            .map(ToolMode::parse)
            .transpose()
            .map_err(|err| JsValue::from_str(&err))?;
        self.widget
            .set_mode(mode)
            .map_err(|err| JsValue::from_str(&err))
    }

    pub fn set_image(&self, mime_type: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let image =
            InlineImage::from_bytes(mime_type, bytes).map_err(|err| JsValue::from_str(&err))?;
        self.widget
            .set_image(Some(image))
            .map_err(|err| JsValue::from_str(&err))
    }

    pub fn clear_image(&self) -> Result<(), JsValue> {
        self.widget
            .set_image(None)
            .map_err(|err| JsValue::from_str(&err))
    }

    pub fn can_submit(&self) -> bool {
        self.widget.can_submit()
    }

    pub fn is_loading(&self) -> bool {
        self.widget.is_loading()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.widget.snapshot())
    }

    /// Resolves to `true` once the response has been applied, or to `false`
    /// immediately when nothing was sent.
    pub fn submit(&self) -> Promise {
        match self.widget.submit() {
            Some(request) => future_to_promise(async move {
                request.await;
                Ok(JsValue::TRUE)
            }),
            None => Promise::resolve(&JsValue::FALSE),
        }
    }

    pub fn dispose(&self) {
        self.widget.dispose();
    }
}

// Persistence

#[wasm_bindgen]
pub struct NotepadHandle {
    notepad: Notepad,
}

#[wasm_bindgen]
impl NotepadHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> NotepadHandle {
        Self {
            notepad: Notepad::open(shared_store()),
        }
    }

    pub fn load(&self) -> Result<String, JsValue> {
        self.notepad.load().map_err(js_error)
    }

    pub fn save(&self, text: &str) -> Result<(), JsValue> {
        self.notepad.save(text).map_err(js_error)
    }

    pub fn clear(&self) -> Result<(), JsValue> {
        self.notepad.clear().map_err(js_error)
    }

    pub fn export(&self, file_name: &str) -> Result<JsValue, JsValue> {
        let text = self.notepad.load().map_err(js_error)?;
        to_js(&export::export_text(file_name, &text))
    }
}

impl Default for NotepadHandle {
    fn default() -> Self {
        Self::new()
    }
}

fn ledger() -> InvoiceLedger {
    InvoiceLedger::open(shared_store())
}

#[wasm_bindgen]
pub fn invoice_next_number() -> Result<String, JsValue> {
    ledger().peek_next().map_err(js_error)
}

#[wasm_bindgen]
pub fn invoice_issue(client: &str, amount: f64, issued_on: &str) -> Result<JsValue, JsValue> {
    let record = issue_invoice_internal(&ledger(), client, amount, issued_on)
        .map_err(|err| JsValue::from_str(&err))?;
    to_js(&record)
}

fn issue_invoice_internal(
    ledger: &InvoiceLedger,
    client: &str,
    amount: f64,
    issued_on: &str,
) -> Result<storage::InvoiceRecord, String> {
    if client.trim().is_empty() {
        return Err("client name is required".into());
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err("amount must be a non-negative number".into());
    }
    ledger
        .issue(client, amount, issued_on)
        .map_err(|err| err.to_string())
}

#[wasm_bindgen]
pub fn invoice_list() -> Result<JsValue, JsValue> {
    let invoices = ledger().invoices().map_err(js_error)?;
    to_js(&invoices)
}

#[wasm_bindgen]
pub fn invoice_reset() -> Result<(), JsValue> {
    ledger().reset().map_err(js_error)
}

// Export

#[wasm_bindgen]
pub fn export_text_file(file_name: &str, content: &str) -> Result<JsValue, JsValue> {
    to_js(&export::export_text(file_name, content))
}

#[wasm_bindgen]
pub fn export_csv_file(
    file_name: &str,
    headers: JsValue,
    rows: JsValue,
) -> Result<JsValue, JsValue> {
    let headers: Vec<String> = config_or_default(headers)?;
    let rows: Vec<Vec<String>> = config_or_default(rows)?;
    let file: ExportFile =
        export::export_csv(file_name, &headers, &rows).map_err(|err| JsValue::from_str(&err))?;
    to_js(&file)
}

#[wasm_bindgen]
pub fn export_png_file(
    file_name: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<JsValue, JsValue> {
    let file = export::export_png(file_name, width, height, rgba)
        .map_err(|err| JsValue::from_str(&err))?;
    to_js(&file)
}

// Text utilities

#[wasm_bindgen]
pub fn flatten_json_text(input: &str, separator: &str, minify: bool) -> Result<String, JsValue> {
    flatten::flatten_json_internal(input, separator, minify)
        .map_err(|err| JsValue::from_str(&err))
}

#[wasm_bindgen]
pub fn unflatten_json_text(input: &str, separator: &str, minify: bool) -> Result<String, JsValue> {
    flatten::unflatten_json_internal(input, separator, minify)
        .map_err(|err| JsValue::from_str(&err))
}

/// Live-preview variant: never fails, shows [`INVALID_INPUT`] instead.
#[wasm_bindgen]
pub fn flatten_json_preview(input: &str, separator: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    or_placeholder(flatten::flatten_json_internal(input, separator, false))
}

#[wasm_bindgen]
pub fn morse_encode(text: &str) -> String {
    morse::encode_morse(text)
}

#[wasm_bindgen]
pub fn morse_decode(code: &str) -> String {
    morse::decode_morse(code)
}

#[wasm_bindgen]
pub fn morse_schedule(code: &str, wpm: u32) -> Result<JsValue, JsValue> {
    to_js(&morse::tone_schedule(code, wpm))
}

#[wasm_bindgen]
pub fn morse_synthesize(
    code: &str,
    wpm: u32,
    frequency: f32,
    sample_rate: u32,
) -> Result<Vec<f32>, JsValue> {
    morse::synthesize(code, wpm, frequency, sample_rate).map_err(|err| JsValue::from_str(&err))
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct TreeSummary {
    inserted: usize,
    duplicates: Vec<i64>,
    height: usize,
    in_order: Vec<i64>,
    pre_order: Vec<i64>,
    post_order: Vec<i64>,
    level_order: Vec<i64>,
    layout: Vec<NodeLayout>,
}

fn bst_summary_internal(text: &str) -> Result<TreeSummary, String> {
    let values = bst::parse_values(text)?;
    let mut tree = SearchTree::new();
    let mut duplicates = Vec::new();
    for value in values {
        if !tree.insert(value) {
            duplicates.push(value);
        }
    }
    Ok(TreeSummary {
        inserted: tree.len(),
        duplicates,
        height: tree.height(),
        in_order: tree.in_order(),
        pre_order: tree.pre_order(),
        post_order: tree.post_order(),
        level_order: tree.level_order(),
        layout: tree.layout(),
    })
}

#[wasm_bindgen]
pub fn bst_build(text: &str) -> Result<JsValue, JsValue> {
    let summary = bst_summary_internal(text).map_err(|err| JsValue::from_str(&err))?;
    to_js(&summary)
}

#[wasm_bindgen]
pub fn bst_contains(text: &str, value: i64) -> Result<bool, JsValue> {
    let values = bst::parse_values(text).map_err(|err| JsValue::from_str(&err))?;
    Ok(SearchTree::from_values(&values).contains(value))
}

#[cfg(test)]
mod lib_tests;
