use crate::dom::parser::parse_fragment;
use crate::ui::error::ClientError;

/// Handle to a node in a `Document` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub enum NodeKind {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

/// An element plus the live state of form controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    /// Attributes in source order
    pub attrs: Vec<(String, String)>,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
}

impl Element {
    pub fn new(tag: &str, attrs: Vec<(String, String)>) -> Self {
        let tag = tag.to_ascii_lowercase();
        let mut element = Element {
            tag,
            attrs,
            value: String::new(),
            checked: false,
            disabled: false,
        };
        element.checked = element.has_attr("checked");
        element.disabled = element.has_attr("disabled");
        element.value = match element.attr("value") {
            Some(v) => v.to_string(),
            None if matches!(element.control_type(), Some("checkbox") | Some("radio")) => {
                "on".to_string()
            }
            None => String::new(),
        };
        element
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn is_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea" | "button")
    }

    /// Browser-style `type` of a form control; `None` for anything else.
    pub fn control_type(&self) -> Option<&str> {
        match self.tag.as_str() {
            "input" => Some(match self.attr("type") {
                Some(t) if !t.is_empty() => t,
                _ => "text",
            }),
            "select" => Some(if self.has_attr("multiple") {
                "select-multiple"
            } else {
                "select-one"
            }),
            "textarea" => Some("textarea"),
            "button" => Some(self.attr("type").unwrap_or("submit")),
            _ => None,
        }
    }

    pub fn is_checkable(&self) -> bool {
        matches!(self.control_type(), Some("checkbox") | Some("radio"))
    }
}

const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Attributes whose presence is their value; written bare when empty.
const BOOLEAN_ATTRS: [&str; 6] = ["checked", "selected", "disabled", "multiple", "readonly", "required"];

pub fn is_boolean_attr(name: &str) -> bool {
    BOOLEAN_ATTRS.contains(&name)
}

pub fn is_raw_text_tag(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style")
}

/// Arena-backed document. Nodes detached from the root stay in the arena,
/// invisible to every query that walks from the root, until `compact` drops
/// them.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
            root: NodeId(0),
        }
    }

    /// Parse a whole page.
    pub fn parse(html: &str) -> Result<Self, ClientError> {
        let mut doc = Document::new();
        let root = doc.root;
        doc.append_html(root, html)?;
        Ok(doc)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Number of nodes held by the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn create_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.create_node(Some(parent), NodeKind::Element(element))
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.create_node(Some(parent), NodeKind::Text(text.to_string()))
    }

    /// Parse `html` and append the resulting nodes to `parent`.
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>, ClientError> {
        parse_fragment(self, parent, html)
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(p) = self.nodes[id.0].parent.take() {
            self.nodes[p.0].children.retain(|c| *c != id);
        }
    }

    /// Move `child` (attached anywhere or detached) to the end of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for c in children {
            self.nodes[c.0].parent = None;
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.set_attr(name, value);
        }
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Drop every node unreachable from the root and renumber the rest in
    /// document order. Any `NodeId` held across this call is stale; the new
    /// id of `keep` is returned when it is still attached.
    pub fn compact(&mut self, keep: NodeId) -> Option<NodeId> {
        let mut order = vec![self.root];
        order.extend(self.descendants(self.root));

        let mut remap: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for (new, old) in order.iter().enumerate() {
            remap[old.0] = Some(NodeId(new));
        }

        let mut old_nodes: Vec<Option<Node>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        self.nodes = order
            .iter()
            .filter_map(|old| old_nodes[old.0].take())
            .map(|mut node| {
                node.parent = node.parent.and_then(|p| remap[p.0]);
                node.children = node.children.iter().filter_map(|c| remap[c.0]).collect();
                node
            })
            .collect();
        self.root = NodeId(0);
        remap[keep.0]
    }

    /// Pre-order descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    fn find_element(&self, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.element(*id).map(&pred).unwrap_or(false))
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element(|e| e.attr("id") == Some(id))
    }

    /// Equivalent of `document.forms[name]`.
    pub fn find_form(&self, name: &str) -> Option<NodeId> {
        self.find_element(|e| {
            e.tag == "form" && (e.attr("name") == Some(name) || e.attr("id") == Some(name))
        })
    }

    pub fn elements_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| {
                self.element(*id)
                    .and_then(|e| e.attr("class"))
                    .map(|c| c.split_whitespace().any(|part| part == class))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) => t.clone(),
            _ => self
                .children(id)
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
        }
    }

    /// Replace every child of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        self.append_text(id, text);
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for c in self.children(id) {
            self.write_html(*c, &mut out, false);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String, raw_text: bool) {
        match &self.nodes[id.0].kind {
            NodeKind::Root => {
                for c in self.children(id) {
                    self.write_html(*c, out, false);
                }
            }
            NodeKind::Text(t) => {
                if raw_text {
                    out.push_str(t);
                } else {
                    out.push_str(&escape_text(t));
                }
            }
            NodeKind::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for (k, v) in self.serialized_attrs(id, e) {
                    out.push(' ');
                    out.push_str(&k);
                    if v.is_empty() && is_boolean_attr(&k) {
                        continue;
                    }
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&v));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&e.tag) {
                    return;
                }
                if e.tag == "textarea" {
                    out.push_str(&escape_text(&e.value));
                } else {
                    let raw = is_raw_text_tag(&e.tag);
                    for c in self.children(id) {
                        self.write_html(*c, out, raw);
                    }
                }
                out.push_str("</");
                out.push_str(&e.tag);
                out.push('>');
            }
        }
    }

    /// Attributes as written out, with live control state reflected back.
    fn serialized_attrs(&self, id: NodeId, e: &Element) -> Vec<(String, String)> {
        let live = matches!(e.tag.as_str(), "input" | "select" | "textarea" | "option");
        if !live {
            return e.attrs.clone();
        }

        let mut attrs: Vec<(String, String)> = e
            .attrs
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "value" | "checked" | "disabled" | "selected"))
            .cloned()
            .collect();

        match e.tag.as_str() {
            "input" => {
                if !e.value.is_empty() || e.has_attr("value") {
                    attrs.push(("value".into(), e.value.clone()));
                }
                if e.checked {
                    attrs.push(("checked".into(), String::new()));
                }
            }
            "option" => {
                if let Some(v) = e.attr("value") {
                    attrs.push(("value".into(), v.to_string()));
                }
                if self.option_selected(id) {
                    attrs.push(("selected".into(), String::new()));
                }
            }
            _ => {}
        }

        if e.disabled {
            attrs.push(("disabled".into(), String::new()));
        }
        attrs
    }

    fn option_selected(&self, option: NodeId) -> bool {
        let mut cursor = self.parent(option);
        while let Some(current) = cursor {
            if let Some(select) = self.element(current).filter(|e| e.tag == "select") {
                return select.value == self.option_value(option);
            }
            cursor = self.parent(current);
        }
        self.element(option)
            .map(|e| e.has_attr("selected"))
            .unwrap_or(false)
    }

    /// An option's submitted value: its `value` attribute, else its trimmed text.
    pub fn option_value(&self, option: NodeId) -> String {
        match self.element(option).and_then(|e| e.attr("value")) {
            Some(v) => v.to_string(),
            None => self.text_content(option).trim().to_string(),
        }
    }

    /// Settle initial values of `<textarea>` and `<select>` under `scope`.
    pub(crate) fn initialize_controls(&mut self, scope: NodeId) {
        let mut ids = self.descendants(scope);
        ids.push(scope);
        for id in ids {
            let tag = match self.element(id) {
                Some(e) => e.tag.clone(),
                None => continue,
            };
            match tag.as_str() {
                "textarea" => {
                    let text = self.text_content(id);
                    let text = text.strip_prefix('\n').unwrap_or(&text).to_string();
                    if let Some(e) = self.element_mut(id) {
                        e.value = text;
                    }
                }
                "select" => {
                    let options: Vec<NodeId> = self
                        .descendants(id)
                        .into_iter()
                        .filter(|o| self.element(*o).map(|e| e.tag == "option").unwrap_or(false))
                        .collect();
                    let chosen = options
                        .iter()
                        .find(|o| self.element(**o).map(|e| e.has_attr("selected")).unwrap_or(false))
                        .or(options.first())
                        .map(|o| self.option_value(*o))
                        .unwrap_or_default();
                    if let Some(e) = self.element_mut(id) {
                        e.value = chosen;
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}
