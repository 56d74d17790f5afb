use serde_json::{Map, Value};

use crate::dom::dom_model::{Document, Element};
use crate::dom::form::{group_type, named_items, option_values};
use crate::render::locked_form::{REVIEW_HEADER, lock_form};
use crate::render::profile::render_profile_html;
use crate::render::profile_model::ProfileData;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, text_fingerprint};
use crate::transport::Transport;
use crate::transport::transport_model::{FetchResult, Method, Request};
use crate::ui::error::ClientError;
use crate::ui::panel::{ButtonAction, ButtonState, PanelName};
use crate::ui::submission::Submission;
use crate::ui::ui_state::UiState;

/// How a user action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action ran to the end (content rendered or message shown)
    Completed,
    /// A fetch failed or returned unusable data; the UI shows why
    Aborted,
}

impl ActionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionOutcome::Completed => "completed",
            ActionOutcome::Aborted => "aborted",
        }
    }
}

/// Owns the page state and runs every user action against a `Transport`.
///
/// Actions are sequential: each one finishes (reset, fetch, render) before the
/// next can start, so at most one panel is ever open.
pub struct UiController<T: Transport> {
    transport: T,
    state: UiState,
    tracer: TraceLogger,
    step: u64,
}

impl<T: Transport> UiController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: UiState::new(),
            tracer: TraceLogger::disabled(),
            step: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_state(mut self, state: UiState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Fetch `path` with a method given by name.
    ///
    /// `Err` only for a method other than GET/POST. Every runtime failure
    /// yields `Ok(None)`: HTTP errors after showing the server's message,
    /// broken exchanges after logging.
    pub fn fetch_data(
        &mut self,
        path: &str,
        method: &str,
        body: Option<&Value>,
    ) -> Result<Option<FetchResult>, ClientError> {
        let method: Method = method.parse()?;
        Ok(self.fetch(path, method, body))
    }

    /// Typed variant of `fetch_data`.
    pub fn fetch(&mut self, path: &str, method: Method, body: Option<&Value>) -> Option<FetchResult> {
        let request = match method {
            Method::Get => Request::get(path),
            Method::Post => match Request::post(path, body) {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!("Error fetching data: {}", e);
                    return None;
                }
            },
        };

        tracing::debug!(method = %method, path, "sending request");

        let response = match self.transport.send(&request) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Error fetching data: {}", e);
                return None;
            }
        };

        let ok = response.is_success();
        let status = response.status;

        let payload = if response.is_json() {
            match serde_json::from_str::<Value>(&response.body) {
                Ok(v) => FetchResult::Json(v),
                Err(e) => {
                    tracing::error!(
                        "Error fetching data: {}",
                        ClientError::JsonParse {
                            context: format!("{} {}", method, path),
                            source: e,
                        }
                    );
                    return None;
                }
            }
        } else {
            FetchResult::Html(response.body)
        };

        if !ok {
            let message = payload
                .message()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            tracing::warn!(status, path, "request failed: {}", message);
            self.write_msg(&message);
            return None;
        }

        Some(payload)
    }

    // ========================================================================
    // Message renderer
    // ========================================================================

    /// Replace the render target's content with a single text message.
    pub fn write_msg(&mut self, text: &str) {
        self.state.clear_target();
        let target = self.state.target();
        let doc = self.state.document_mut();
        let div = doc.append_element(
            target,
            Element::new("div", vec![("class".into(), "message-container".into())]),
        );
        doc.append_text(div, text);
    }

    // ========================================================================
    // Panel toggle bookkeeping
    // ========================================================================

    /// Turn a panel's button back into its "open" form and clear the target.
    /// No-op when the button already shows its inactive label.
    pub fn reset_button(&mut self, panel: PanelName) {
        let inactive = panel.button().inactive_label;
        if self.state.button(panel).label != inactive {
            *self.state.button_mut(panel) = ButtonState::inactive(panel);
            self.state.clear_target();
        }
    }

    /// Reset the given panels, in order.
    pub fn reset_all_buttons(&mut self, panels: &[PanelName]) {
        for panel in panels {
            self.reset_button(*panel);
        }
    }

    /// Reset form, input and profile, in that order.
    pub fn reset_all(&mut self) {
        self.reset_all_buttons(&PanelName::ALL);
    }

    /// Turn a panel's button into its "close" form.
    pub fn activate_button(&mut self, panel: PanelName) {
        *self.state.button_mut(panel) = ButtonState {
            label: panel.button().active_label.to_string(),
            action: ButtonAction::Close(panel),
        };
    }

    /// Click a panel button: run whatever it is currently bound to.
    pub fn press(&mut self, panel: PanelName) -> Result<ActionOutcome, ClientError> {
        match self.state.button(panel).action {
            ButtonAction::Open(p) => self.open(p),
            ButtonAction::Close(p) => {
                self.close(p);
                Ok(ActionOutcome::Completed)
            }
        }
    }

    /// Close a panel if it is open, as its "close" button would.
    pub fn close(&mut self, panel: PanelName) {
        self.reset_button(panel);
        self.record("close", None, ActionOutcome::Completed.as_str());
    }

    /// Run a panel's fetch-and-render entry point.
    pub fn open(&mut self, panel: PanelName) -> Result<ActionOutcome, ClientError> {
        match panel {
            PanelName::Form => self.fetch_form(),
            PanelName::Input => self.view_input(),
            PanelName::Profile => self.view_profile(),
        }
    }

    /// Append the "Go to Top" button to the render target.
    pub fn insert_scroll_button(&mut self) {
        let target = self.state.target();
        let doc = self.state.document_mut();
        let button = doc.append_element(
            target,
            Element::new("button", vec![("class".into(), "scroll-button".into())]),
        );
        doc.append_text(button, "Go to Top");
    }

    // ========================================================================
    // View renderers
    // ========================================================================

    /// View Form: show the questionnaire.
    pub fn fetch_form(&mut self) -> Result<ActionOutcome, ClientError> {
        let outcome = self.fetch_form_inner();
        self.finish("fetch_form", "/form", outcome)
    }

    fn fetch_form_inner(&mut self) -> Result<ActionOutcome, ClientError> {
        self.reset_all();

        let Some(result) = self.fetch("/form", Method::Get, None) else {
            return Ok(ActionOutcome::Aborted);
        };
        let Some(html) = self.expect_html("/form", result) else {
            return Ok(ActionOutcome::Aborted);
        };

        self.state.clear_target();
        let target = self.state.target();
        if let Err(e) = self.state.document_mut().append_html(target, &html) {
            tracing::error!("could not render form: {}", e);
            self.write_msg(&e.to_string());
            return Ok(ActionOutcome::Aborted);
        }

        self.activate_button(PanelName::Form);
        self.insert_scroll_button();
        tracing::info!("form rendered");
        Ok(ActionOutcome::Completed)
    }

    /// Submit: send the rendered form's answers, or the repeat sentinel when
    /// no form is on the page.
    pub fn submit_form(&mut self) -> Result<ActionOutcome, ClientError> {
        let outcome = self.submit_form_inner();
        self.finish("submit_form", "/submit", outcome)
    }

    fn submit_form_inner(&mut self) -> Result<ActionOutcome, ClientError> {
        // Read the answers first: resetting the form panel detaches the form
        let submission = Submission::from_form(self.state.document(), self.state.form());
        self.reset_all();

        let body = serde_json::to_value(&submission).map_err(|e| ClientError::JsonSerialize {
            context: "form submission".into(),
            source: e,
        })?;

        let Some(result) = self.fetch("/submit", Method::Post, Some(&body)) else {
            return Ok(ActionOutcome::Aborted);
        };
        self.show_confirmation("/submit", result)
    }

    /// Analyse: ask the server to build the profile.
    pub fn analyze(&mut self) -> Result<ActionOutcome, ClientError> {
        let outcome = self.analyze_inner();
        self.finish("analyze", "/analyze", outcome)
    }

    fn analyze_inner(&mut self) -> Result<ActionOutcome, ClientError> {
        self.reset_all();
        self.write_msg("Analysing...");

        let Some(result) = self.fetch("/analyze", Method::Post, None) else {
            return Ok(ActionOutcome::Aborted);
        };
        self.show_confirmation("/analyze", result)
    }

    /// Review: show the stored answers in a locked form.
    pub fn view_input(&mut self) -> Result<ActionOutcome, ClientError> {
        let outcome = self.view_input_inner();
        self.finish("view_input", "/view/input", outcome)
    }

    fn view_input_inner(&mut self) -> Result<ActionOutcome, ClientError> {
        self.reset_all();

        let Some(result) = self.fetch("/view/input", Method::Get, None) else {
            return Ok(ActionOutcome::Aborted);
        };
        let Some(data) = self.expect_object("/view/input", result) else {
            return Ok(ActionOutcome::Aborted);
        };

        if let Err(e) = self.insert_locked_form(&data) {
            tracing::error!("could not render review: {}", e);
            self.write_msg(&e.to_string());
            return Ok(ActionOutcome::Aborted);
        }

        self.activate_button(PanelName::Input);
        self.insert_scroll_button();
        tracing::info!(fields = data.len(), "review rendered");
        Ok(ActionOutcome::Completed)
    }

    /// Put a form under a review header, rename it and lock it with `data`.
    ///
    /// Reuses the form already on the page, otherwise fetches `/form`.
    /// Fails with `FormUnavailable` when neither yields a form.
    pub fn insert_locked_form(&mut self, data: &Map<String, Value>) -> Result<(), ClientError> {
        let form = match self.state.form() {
            Some(form) => {
                let target = self.state.target();
                let doc = self.state.document_mut();
                doc.detach(form);
                doc.clear_children(target);
                doc.append_html(target, REVIEW_HEADER)?;
                doc.append_child(target, form);
                form
            }
            None => {
                let html = self
                    .fetch("/form", Method::Get, None)
                    .and_then(FetchResult::into_html)
                    .ok_or(ClientError::FormUnavailable)?;
                let target = self.state.target();
                let doc = self.state.document_mut();
                doc.clear_children(target);
                doc.append_html(target, REVIEW_HEADER)?;
                doc.append_html(target, &html)?;
                self.state.form().ok_or(ClientError::FormUnavailable)?
            }
        };

        lock_form(self.state.document_mut(), form, data);
        Ok(())
    }

    /// View Profile: render the analysis results.
    pub fn view_profile(&mut self) -> Result<ActionOutcome, ClientError> {
        let outcome = self.view_profile_inner();
        self.finish("view_profile", "/view/profile", outcome)
    }

    fn view_profile_inner(&mut self) -> Result<ActionOutcome, ClientError> {
        self.reset_all();

        let Some(result) = self.fetch("/view/profile", Method::Get, None) else {
            return Ok(ActionOutcome::Aborted);
        };
        let Some(value) = self.expect_json("/view/profile", result) else {
            return Ok(ActionOutcome::Aborted);
        };

        let data: ProfileData = match serde_json::from_value(value) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(
                    "{}",
                    ClientError::JsonParse {
                        context: "profile data".into(),
                        source: e,
                    }
                );
                self.write_msg("Malformed profile data");
                return Ok(ActionOutcome::Aborted);
            }
        };

        self.insert_profile(&data)?;
        self.activate_button(PanelName::Profile);
        self.insert_scroll_button();
        tracing::info!(pets = data.pets.len(), "profile rendered");
        Ok(ActionOutcome::Completed)
    }

    /// Replace the render target with the profile view.
    pub fn insert_profile(&mut self, data: &ProfileData) -> Result<(), ClientError> {
        let html = render_profile_html(data);
        self.state.clear_target();
        let target = self.state.target();
        self.state.document_mut().append_html(target, &html)?;
        Ok(())
    }

    /// Logo / "Return Home": load the home page in place of the current one.
    pub fn return_home(&mut self) -> Result<ActionOutcome, ClientError> {
        let outcome = self.return_home_inner();
        self.finish("return_home", "/", outcome)
    }

    fn return_home_inner(&mut self) -> Result<ActionOutcome, ClientError> {
        let Some(result) = self.fetch("/", Method::Get, None) else {
            return Ok(ActionOutcome::Aborted);
        };
        let Some(html) = self.expect_html("/", result) else {
            return Ok(ActionOutcome::Aborted);
        };

        match Document::parse(&html) {
            Ok(doc) => {
                self.state.load_page(doc);
                Ok(ActionOutcome::Completed)
            }
            Err(e) => {
                tracing::error!("could not load home page: {}", e);
                self.write_msg(&e.to_string());
                Ok(ActionOutcome::Aborted)
            }
        }
    }

    // ========================================================================
    // Live form input
    // ========================================================================

    /// Set a field of the live form, as a user typing or ticking would.
    ///
    /// Text-like fields and selects take the first value, a radio group
    /// checks the option equal to the first value, and a checkbox group
    /// checks exactly the listed values.
    pub fn fill_field(&mut self, name: &str, values: &[String]) -> Result<(), ClientError> {
        let result = self.fill_field_inner(name, values);
        let outcome = match &result {
            Ok(()) => ActionOutcome::Completed.as_str(),
            Err(_) => "error",
        };
        self.record("fill", None, outcome);
        result
    }

    fn fill_field_inner(&mut self, name: &str, values: &[String]) -> Result<(), ClientError> {
        let form = self.state.form().ok_or(ClientError::FormUnavailable)?;
        let doc = self.state.document_mut();

        let items = named_items(doc, form, name);
        if items.is_empty() {
            return Err(ClientError::FieldNotFound {
                field: name.to_string(),
                context: "no control with that name in the form".into(),
            });
        }

        let kind = group_type(doc, &items).unwrap_or_default();
        let first = values.first().cloned().unwrap_or_default();

        match kind.as_str() {
            "checkbox" | "radio" => {
                let wanted: Vec<&String> = if kind == "radio" {
                    values.iter().take(1).collect()
                } else {
                    values.iter().collect()
                };
                let offered: Vec<String> = items
                    .iter()
                    .filter_map(|id| doc.element(*id))
                    .map(|e| e.value.clone())
                    .collect();
                if let Some(missing) = wanted.iter().find(|v| !offered.contains(**v)) {
                    return Err(ClientError::FieldNotFound {
                        field: name.to_string(),
                        context: format!("no option with value '{}'", missing),
                    });
                }
                for id in &items {
                    if let Some(e) = doc.element_mut(*id) {
                        e.checked = wanted.iter().any(|v| **v == e.value);
                    }
                }
            }
            "select-one" | "select-multiple" => {
                let select = items[0];
                if !option_values(doc, select).contains(&first) {
                    return Err(ClientError::FieldNotFound {
                        field: name.to_string(),
                        context: format!("no option with value '{}'", first),
                    });
                }
                if let Some(e) = doc.element_mut(select) {
                    e.value = first;
                }
            }
            _ => {
                for id in &items {
                    if let Some(e) = doc.element_mut(*id) {
                        e.value = first.clone();
                    }
                }
            }
        }

        tracing::debug!(field = name, "field filled");
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Show the `message` of a JSON confirmation.
    fn show_confirmation(
        &mut self,
        path: &str,
        result: FetchResult,
    ) -> Result<ActionOutcome, ClientError> {
        let Some(value) = self.expect_json(path, result) else {
            return Ok(ActionOutcome::Aborted);
        };
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("OK")
            .to_string();
        self.write_msg(&message);
        Ok(ActionOutcome::Completed)
    }

    fn expect_json(&mut self, path: &str, result: FetchResult) -> Option<Value> {
        match result {
            FetchResult::Json(v) => Some(v),
            FetchResult::Html(_) => {
                self.unexpected(path, "JSON");
                None
            }
        }
    }

    fn expect_object(&mut self, path: &str, result: FetchResult) -> Option<Map<String, Value>> {
        match self.expect_json(path, result)? {
            Value::Object(map) => Some(map),
            _ => {
                self.unexpected(path, "a JSON object");
                None
            }
        }
    }

    fn expect_html(&mut self, path: &str, result: FetchResult) -> Option<String> {
        match result {
            FetchResult::Html(h) => Some(h),
            FetchResult::Json(_) => {
                self.unexpected(path, "HTML");
                None
            }
        }
    }

    fn unexpected(&mut self, path: &str, expected: &str) {
        let err = ClientError::UnexpectedContent {
            path: path.to_string(),
            expected: expected.to_string(),
        };
        tracing::error!("{}", err);
        self.write_msg(&format!("Unexpected response from {}", path));
    }

    fn finish(
        &mut self,
        action: &str,
        path: &str,
        outcome: Result<ActionOutcome, ClientError>,
    ) -> Result<ActionOutcome, ClientError> {
        let label = match &outcome {
            Ok(o) => o.as_str(),
            Err(_) => "error",
        };
        self.record(action, Some(path), label);
        outcome
    }

    fn record(&mut self, action: &str, path: Option<&str>, outcome: &str) {
        self.step += 1;
        if !self.tracer.is_enabled() {
            return;
        }

        let mut event = TraceEvent::now(self.step, action)
            .with_outcome(outcome)
            .with_panel(self.state.active_panel())
            .with_fingerprint(text_fingerprint(&self.state.target_html()));
        if let Some(p) = path {
            event = event.with_path(p);
        }
        self.tracer.log(&event);
    }
}
