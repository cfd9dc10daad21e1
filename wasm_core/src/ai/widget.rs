//! State owned by one AI-backed tool instance.
//!
//! `submit` flips the loading flag synchronously and returns the future that
//! performs the request; the caller spawns it on the UI event loop. The
//! future only writes back while the widget's [`Lifetime`] is still alive.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{
    AiTool, CompletionTransport, DEFAULT_MODEL, FAILURE_MESSAGE, InlineImage, ResponseSchema,
    ServiceError, ToolMode,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum WidgetOutput {
    Empty,
    Text(String),
    Structured(Map<String, Value>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetState {
    pub input: String,
    pub mode: Option<ToolMode>,
    #[serde(skip)]
    pub image: Option<InlineImage>,
    pub has_image: bool,
    pub loading: bool,
    pub output: WidgetOutput,
}

impl WidgetState {
    fn new(mode: Option<ToolMode>) -> Self {
        Self {
            input: String::new(),
            mode,
            image: None,
            has_image: false,
            loading: false,
            output: WidgetOutput::Empty,
        }
    }
}

/// Mounted flag shared between a widget and its in-flight requests.
#[derive(Debug, Clone)]
pub struct Lifetime(Rc<Cell<bool>>);

impl Lifetime {
    fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    fn end(&self) {
        self.0.set(false);
    }
}

pub struct GenerativeWidget<T> {
    tool: AiTool,
    model: String,
    transport: Rc<T>,
    state: Rc<RefCell<WidgetState>>,
    lifetime: Lifetime,
}

impl<T: CompletionTransport + 'static> GenerativeWidget<T> {
    pub fn new(tool: AiTool, transport: Rc<T>) -> Self {
        Self::with_model(tool, transport, DEFAULT_MODEL)
    }

    pub fn with_model(tool: AiTool, transport: Rc<T>, model: &str) -> Self {
        Self {
            tool,
            model: model.to_string(),
            transport,
            state: Rc::new(RefCell::new(WidgetState::new(tool.default_mode()))),
            lifetime: Lifetime::new(),
        }
    }

    pub fn tool(&self) -> AiTool {
        self.tool
    }

    pub fn snapshot(&self) -> WidgetState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn set_input(&self, input: &str) {
        self.state.borrow_mut().input = input.to_string();
    }

    pub fn set_mode(&self, mode: Option<ToolMode>) -> Result<(), String> {
        if let Some(mode) = mode {
            if !self.tool.modes().contains(&mode) {
                return Err(format!("mode {mode:?} is not available for this tool"));
            }
        }
        self.state.borrow_mut().mode = mode;
        Ok(())
    }

    pub fn set_image(&self, image: Option<InlineImage>) -> Result<(), String> {
        if image.is_some() && !self.tool.accepts_image() {
            return Err("this tool does not accept images".into());
        }
        let mut state = self.state.borrow_mut();
        state.has_image = image.is_some();
        state.image = image;
        Ok(())
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        let state = self.state.borrow();
        !state.loading
            && if self.tool.image_only() {
                state.image.is_some()
            } else {
                !state.input.trim().is_empty()
            }
    }

    /// Issues one request. Returns `None` without touching state when the
    /// input is empty or a request is already in flight.
    pub fn submit(&self) -> Option<LocalBoxFuture<'static, ()>> {
        let request = {
            let mut state = self.state.borrow_mut();
            if state.loading {
                return None;
            }
            let request = self
                .tool
                .build_request(&state.input, state.mode, state.image.clone(), &self.model)
                .ok()?;
            state.loading = true;
            if matches!(state.output, WidgetOutput::Failed(_)) {
                state.output = WidgetOutput::Empty;
            }
            request
        };
        let transport = Rc::clone(&self.transport);
        let state = Rc::clone(&self.state);
        let lifetime = self.lifetime.clone();
        let tool = self.tool;
        Some(
            async move {
                let result = transport.complete(&request).await;
                if !lifetime.is_alive() {
                    debug!(?tool, "widget disposed before response; discarding");
                    return;
                }
                let output = interpret(result, request.schema.as_ref());
                let mut state = state.borrow_mut();
                state.loading = false;
                state.output = output;
            }
            .boxed_local(),
        )
    }

    /// Detaches the widget from any in-flight response.
    pub fn dispose(&self) {
        self.lifetime.end();
    }
}

impl<T> Drop for GenerativeWidget<T> {
    fn drop(&mut self) {
        self.lifetime.end();
    }
}

fn interpret(
    result: Result<String, ServiceError>,
    schema: Option<&ResponseSchema>,
) -> WidgetOutput {
    let parsed = result.and_then(|text| match schema {
        Some(schema) => schema.validate(&text).map(WidgetOutput::Structured),
        None => Ok(WidgetOutput::Text(text.trim().to_string())),
    });
    match parsed {
        Ok(output) => output,
        Err(err) => {
            warn!(error = %err, "generation failed");
            WidgetOutput::Failed(FAILURE_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::ai::transport::mock::MockTransport;

    fn widget(
        tool: AiTool,
        replies: Vec<Result<String, ServiceError>>,
    ) -> GenerativeWidget<MockTransport> {
        GenerativeWidget::new(tool, Rc::new(MockTransport::with_replies(replies)))
    }

    #[test]
    fn structured_reply_is_shown_verbatim() {
        let w = widget(
            AiTool::AiDetector,
            vec![Ok(r#"{"probability": 0.37, "rationale": "varied rhythm"}"#.into())],
        );
        w.set_input("Some essay text.");
        block_on(w.submit().expect("submitted"));
        let state = w.snapshot();
        assert!(!state.loading);
        let WidgetOutput::Structured(map) = state.output else {
            panic!("expected structured output");
        };
        assert_eq!(map["probability"], json!(0.37));
        assert_eq!(map["rationale"], json!("varied rhythm"));
    }

    #[test]
    fn network_failure_substitutes_fixed_message() {
        let w = widget(
            AiTool::GrammarFixer,
            vec![Err(ServiceError::Network("offline".into()))],
        );
        w.set_input("me go home");
        block_on(w.submit().unwrap());
        let state = w.snapshot();
        assert!(!state.loading);
        assert_eq!(state.output, WidgetOutput::Failed(FAILURE_MESSAGE.into()));
    }

    #[test]
    fn malformed_json_substitutes_fixed_message() {
        let w = widget(AiTool::SeoOptimizer, vec![Ok("Title: Great page".into())]);
        w.set_input("landing page copy");
        block_on(w.submit().unwrap());
        assert_eq!(
            w.snapshot().output,
            WidgetOutput::Failed(FAILURE_MESSAGE.into())
        );
        assert!(!w.is_loading());
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let w = widget(AiTool::Humanizer, vec![Ok("x".into())]);
        w.set_input("   ");
        assert!(!w.can_submit());
        assert!(w.submit().is_none());
        assert_eq!(w.snapshot(), WidgetState::new(AiTool::Humanizer.default_mode()));
    }

    #[test]
    fn second_submit_while_loading_is_ignored() {
        let w = widget(AiTool::Summarizer, vec![Ok(" first ".into()), Ok("second".into())]);
        w.set_input("text");
        let pending = w.submit().expect("first submit");
        assert!(w.is_loading());
        assert!(w.submit().is_none());
        block_on(pending);
        assert_eq!(w.snapshot().output, WidgetOutput::Text("first".into()));
        assert_eq!(w.transport.seen.borrow().len(), 1);
    }

    #[test]
    fn retry_after_failure_clears_error() {
        let w = widget(
            AiTool::Paraphraser,
            vec![Err(ServiceError::Status(500)), Ok("better".into())],
        );
        w.set_input("text");
        block_on(w.submit().unwrap());
        let retry = w.submit().unwrap();
        assert_eq!(w.snapshot().output, WidgetOutput::Empty);
        block_on(retry);
        assert_eq!(w.snapshot().output, WidgetOutput::Text("better".into()));
    }

    #[test]
    fn response_after_drop_is_discarded() {
        let w = widget(AiTool::GrammarFixer, vec![Ok("fixed".into())]);
        w.set_input("text");
        let pending = w.submit().unwrap();
        let state = Rc::clone(&w.state);
        drop(w);
        block_on(pending);
        let state = state.borrow();
        assert!(state.loading);
        assert_eq!(state.output, WidgetOutput::Empty);
    }

    #[test]
    fn response_after_dispose_is_discarded() {
        let w = widget(AiTool::Paraphraser, vec![Ok("reworded".into())]);
        w.set_input("text");
        let pending = w.submit().unwrap();
        w.dispose();
        block_on(pending);
        let state = w.snapshot();
        assert!(state.loading);
        assert_eq!(state.output, WidgetOutput::Empty);
        assert_eq!(w.transport.seen.borrow().len(), 1);
    }

    #[test]
    fn hashtag_list_is_validated() {
        let w = widget(
            AiTool::HashtagGenerator,
            vec![
                Ok(r##"{"hashtags": ["#rust", "#wasm"]}"##.into()),
                Ok(r##"{"hashtags": ["#a", 3]}"##.into()),
            ],
        );
        w.set_input("a post about compiling Rust to the browser");
        block_on(w.submit().unwrap());
        let WidgetOutput::Structured(map) = w.snapshot().output else {
            panic!("expected structured output");
        };
        assert_eq!(map["hashtags"], json!(["#rust", "#wasm"]));

        block_on(w.submit().unwrap());
        assert_eq!(
            w.snapshot().output,
            WidgetOutput::Failed(FAILURE_MESSAGE.into())
        );
        assert!(!w.is_loading());
    }

    #[test]
    fn mode_and_image_are_validated() {
        let w = widget(AiTool::GrammarFixer, vec![]);
        assert!(w.set_mode(Some(ToolMode::Formal)).is_err());
        let image = InlineImage::from_bytes("image/png", b"x").unwrap();
        assert!(w.set_image(Some(image.clone())).is_err());

        let caption = widget(AiTool::ImageCaption, vec![Ok("A cat on a mat.".into())]);
        assert!(!caption.can_submit());
        caption.set_image(Some(image)).unwrap();
        caption.set_mode(Some(ToolMode::Creative)).unwrap();
        block_on(caption.submit().unwrap());
        let seen = caption.transport.seen.borrow();
        assert!(seen[0].instruction.contains("creative"));
        assert!(seen[0].image.is_some());
    }
}
