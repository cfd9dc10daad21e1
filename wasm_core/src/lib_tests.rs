use super::*;
use crate::ai::transport::mock::MockTransport;
use crate::ai::{ServiceError, WidgetOutput};
use crate::draw::{DrawPhase, random::ScriptedRandom};
use crate::router::Route;
use futures::executor::block_on;
use pretty_assertions::assert_eq;
use serde_json::json;

fn memory_store() -> Rc<dyn KeyValueStore> {
    Rc::new(MemoryStore::new())
}

#[test]
fn list_tools_without_query_returns_whole_catalogue() {
    assert_eq!(list_tools_internal("  ").len(), TOOLS.len());
    let hits = list_tools_internal("wheel");
    assert!(hits.iter().any(|tool| tool.id == "spin-wheel"));
}

#[test]
fn category_summaries_cover_the_catalogue() {
    let summaries = catalogue::category_summaries();
    assert_eq!(summaries.len(), catalogue::Category::ALL.len());
    assert!(summaries.iter().all(|summary| summary.count > 0));
    let total: usize = summaries.iter().map(|summary| summary.count).sum();
    assert_eq!(total, TOOLS.len());
}

#[test]
fn tool_doc_is_localized() {
    let en = tool_doc_internal("notepad", Locale::En).unwrap();
    let de = tool_doc_internal("notepad", Locale::De).unwrap();
    assert!(en.faq.contains("Notepad"));
    assert_ne!(en.about, de.about);
    let err = tool_doc_internal("nope", Locale::En).unwrap_err();
    assert!(err.contains("unknown tool"), "msg: {err}");
}

#[test]
fn generative_tool_rejects_local_tools() {
    assert_eq!(generative_tool("grammar-fixer").unwrap(), AiTool::GrammarFixer);
    assert!(generative_tool("notepad").unwrap_err().contains("not an AI tool"));
    assert!(generative_tool("missing").unwrap_err().contains("unknown tool"));
}

#[test]
fn every_route_to_a_draw_tool_resolves() {
    for id in ["random-picker", "spin-wheel"] {
        match router::parse_location(&format!("#/tool/{id}")) {
            Route::Tool(tool) => assert!(matches!(tool.engine, Engine::Draw(_))),
            other => panic!("unexpected route {other:?}"),
        }
    }
}

#[test]
fn invoices_are_numbered_sequentially() {
    let ledger = InvoiceLedger::open(memory_store());
    let first = issue_invoice_internal(&ledger, "Acme", 120.5, "2024-05-01").unwrap();
    let second = issue_invoice_internal(&ledger, " Globex ", 80.0, "2024-05-02").unwrap();
    assert_eq!(first.number, "INV-0001");
    assert_eq!(second.number, "INV-0002");
    assert_eq!(second.client, "Globex");
    assert_eq!(ledger.peek_next().unwrap(), "INV-0003");
}

#[test]
fn invoice_validation_leaves_sequence_untouched() {
    let ledger = InvoiceLedger::open(memory_store());
    assert!(issue_invoice_internal(&ledger, "  ", 10.0, "2024-05-01").is_err());
    assert!(issue_invoice_internal(&ledger, "Acme", -1.0, "2024-05-01").is_err());
    assert!(issue_invoice_internal(&ledger, "Acme", f64::NAN, "2024-05-01").is_err());
    assert_eq!(ledger.sequence().unwrap(), 0);
}

#[test]
fn notepad_and_locale_share_one_store() {
    let store = memory_store();
    let app = AppContext::init(Rc::clone(&store));
    app.set_locale(Locale::Es).unwrap();
    Notepad::open(app.store()).save("draft text").unwrap();

    let reloaded = AppContext::init(store);
    assert_eq!(reloaded.locale(), Locale::Es);
    assert_eq!(Notepad::open(reloaded.store()).load().unwrap(), "draft text");
}

#[test]
fn bst_summary_reports_duplicates() {
    let summary = bst_summary_internal("8 3 10, 3 1 6 8").unwrap();
    assert_eq!(summary.inserted, 5);
    assert_eq!(summary.duplicates, vec![3, 8]);
    assert_eq!(summary.in_order, vec![1, 3, 6, 8, 10]);
    assert_eq!(summary.level_order, vec![8, 3, 10, 1, 6]);
    assert_eq!(summary.height, 3);
    assert_eq!(summary.layout.len(), 5);
}

#[test]
fn bst_summary_rejects_words() {
    let err = bst_summary_internal("1 two 3").unwrap_err();
    assert!(err.contains("'two'"), "msg: {err}");
}

#[test]
fn flatten_preview_uses_placeholder() {
    assert_eq!(flatten_json_preview("{\"a\":{\"b\":1}}", "."), "{\n  \"a.b\": 1\n}");
    assert_eq!(flatten_json_preview("{oops", "."), INVALID_INPUT);
    assert_eq!(flatten_json_preview("   ", "."), "");
}

#[test]
fn morse_bindings_round_trip_text() {
    let code = morse_encode("Hello World");
    assert_eq!(code, ".... . .-.. .-.. --- / .-- --- .-. .-.. -..");
    assert_eq!(morse_decode(&code), "HELLO WORLD");
}

#[test]
fn picker_and_wheel_satisfy_fixed_scenarios() {
    let names = "Alice\nBob\nCarol";
    let mut picker = WinnerPicker::new(parse_candidates(names, false));
    let mut rng = ScriptedRandom::new(vec![1], vec![0.5]);
    assert!(picker.start(0.0, &mut rng));
    assert_eq!(picker.advance(3_000.0), DrawPhase::Revealed);
    assert_eq!(picker.winner(), Some("Bob"));

    let mut wheel = SpinWheel::new(parse_candidates("A\nB\nC\nD", false));
    wheel.set_rotation(std::f64::consts::FRAC_PI_2);
    assert_eq!(draw::wheel::slice_at(wheel.rotation(), 4), 1);
}

#[test]
fn detector_widget_surfaces_structured_reply() {
    let reply = json!({"probability": 0.82, "rationale": "uniform sentence length"});
    let transport = Rc::new(MockTransport::with_replies(vec![Ok(reply.to_string())]));
    let widget = GenerativeWidget::new(AiTool::AiDetector, Rc::clone(&transport));
    widget.set_input("Some essay text");
    let request = widget.submit().expect("request issued");
    assert!(widget.is_loading());
    block_on(request);

    let state = widget.snapshot();
    assert!(!state.loading);
    match state.output {
        WidgetOutput::Structured(map) => assert_eq!(serde_json::Value::Object(map), reply),
        other => panic!("unexpected output {other:?}"),
    }
}

#[test]
fn failed_request_shows_fixed_message() {
    let transport = Rc::new(MockTransport::with_replies(vec![Err(ServiceError::Status(503))]));
    let widget = GenerativeWidget::new(AiTool::Summarizer, transport);
    widget.set_input("long article");
    block_on(widget.submit().expect("request issued"));
    let state = widget.snapshot();
    assert!(!state.loading);
    assert_eq!(state.output, WidgetOutput::Failed(ai::FAILURE_MESSAGE.to_string()));
}

#[test]
fn editing_text_after_reveal_clears_winner() {
    let mut picker = WinnerPicker::new(parse_candidates("Ann\nBen", false));
    let mut rng = ScriptedRandom::new(vec![0], vec![0.5]);
    assert!(picker.start(0.0, &mut rng));
    picker.advance(3_000.0);
    assert_eq!(picker.winner(), Some("Ann"));

    picker.edit_text("Ann\nAnn\nCy", true);
    assert_eq!(picker.phase(), DrawPhase::Idle);
    assert_eq!(picker.winner(), None);
    assert_eq!(picker.candidates().as_slice(), ["Ann", "Cy"]);
}
