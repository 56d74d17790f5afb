use crate::dom::dom_model::{Document, Element, NodeId};
use crate::ui::panel::{ButtonState, PanelName};

/// Id of the single container every panel renders into.
pub const RENDER_TARGET_ID: &str = "mydiv1";

/// Name of the live, submittable questionnaire form.
pub const FORM_NAME: &str = "psychoform";

/// Name given to the form once it is locked for review.
pub const LOCKED_FORM_NAME: &str = "viewpsychoform";

/// Everything the controller mutates: the page, its render target and the
/// three panel buttons.
#[derive(Debug, Clone)]
pub struct UiState {
    document: Document,
    target: NodeId,
    buttons: [ButtonState; 3],
}

impl UiState {
    /// A blank page holding only an empty render target.
    pub fn new() -> Self {
        let mut document = Document::new();
        let root = document.root();
        let target = document.append_element(
            root,
            Element::new("div", vec![("id".into(), RENDER_TARGET_ID.into())]),
        );
        Self {
            document,
            target,
            buttons: PanelName::ALL.map(ButtonState::inactive),
        }
    }

    /// Adopt a freshly loaded page. Buttons start over as inactive and the
    /// render target is located by id, or appended when the page lacks one.
    pub fn load_page(&mut self, document: Document) {
        self.document = document;
        self.target = match self.document.by_id(RENDER_TARGET_ID) {
            Some(id) => id,
            None => {
                let root = self.document.root();
                self.document.append_element(
                    root,
                    Element::new("div", vec![("id".into(), RENDER_TARGET_ID.into())]),
                )
            }
        };
        self.buttons = PanelName::ALL.map(ButtonState::inactive);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn button(&self, panel: PanelName) -> &ButtonState {
        &self.buttons[panel.index()]
    }

    pub(crate) fn button_mut(&mut self, panel: PanelName) -> &mut ButtonState {
        &mut self.buttons[panel.index()]
    }

    /// The panel whose button currently reads as a "close" button.
    pub fn active_panel(&self) -> Option<PanelName> {
        PanelName::ALL
            .into_iter()
            .find(|p| self.button(*p).is_active())
    }

    /// Empty the render target and release whatever it held from the arena.
    pub fn clear_target(&mut self) {
        let target = self.target;
        self.document.clear_children(target);
        if self.document.is_attached(target) {
            if let Some(moved) = self.document.compact(target) {
                self.target = moved;
            }
        }
    }

    pub fn is_target_empty(&self) -> bool {
        self.document.children(self.target).is_empty()
    }

    pub fn target_html(&self) -> String {
        self.document.inner_html(self.target)
    }

    /// Text of the render target with whitespace runs collapsed.
    pub fn target_text(&self) -> String {
        self.document
            .text_content(self.target)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text of the message element, when the target holds a message.
    pub fn message(&self) -> Option<String> {
        self.document
            .elements_by_class(self.target, "message-container")
            .first()
            .map(|id| self.document.text_content(*id))
    }

    /// The live form, if one is rendered anywhere on the page.
    pub fn form(&self) -> Option<NodeId> {
        self.document.find_form(FORM_NAME)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
