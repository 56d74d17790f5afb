use crate::dom::dom_model::{Document, NodeId};

/// Controls owned by `form`, in document order (`form.elements`).
pub fn form_controls(doc: &Document, form: NodeId) -> Vec<NodeId> {
    doc.descendants(form)
        .into_iter()
        .filter(|id| doc.element(*id).map(|e| e.is_control()).unwrap_or(false))
        .collect()
}

/// Controls whose `name` (or `id`) is `name` (`form.elements.namedItem(name)`).
pub fn named_items(doc: &Document, form: NodeId, name: &str) -> Vec<NodeId> {
    form_controls(doc, form)
        .into_iter()
        .filter(|id| {
            doc.element(*id)
                .map(|e| e.attr("name") == Some(name) || e.attr("id") == Some(name))
                .unwrap_or(false)
        })
        .collect()
}

/// Type of the first control registered under `name`; groups share one type.
pub fn group_type(doc: &Document, items: &[NodeId]) -> Option<String> {
    items
        .first()
        .and_then(|id| doc.element(*id))
        .and_then(|e| e.control_type())
        .map(|t| t.to_string())
}

/// Distinct names of checkbox controls, in document order.
pub fn checkbox_names(doc: &Document, form: NodeId) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for id in form_controls(doc, form) {
        let Some(e) = doc.element(id) else { continue };
        if e.control_type() != Some("checkbox") {
            continue;
        }
        if let Some(name) = e.attr("name") {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// The `(name, value)` pairs a browser would put in `new FormData(form)`.
///
/// Skips unnamed and disabled controls, buttons, file inputs and unchecked
/// checkboxes/radios.
pub fn form_data_entries(doc: &Document, form: NodeId) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for id in form_controls(doc, form) {
        let Some(e) = doc.element(id) else { continue };
        let Some(name) = e.attr("name") else { continue };
        if name.is_empty() || e.disabled || e.tag == "button" {
            continue;
        }
        match e.control_type() {
            Some("submit") | Some("reset") | Some("button") | Some("image") | Some("file") => {
                continue;
            }
            Some("checkbox") | Some("radio") if !e.checked => continue,
            _ => {}
        }
        entries.push((name.to_string(), e.value.clone()));
    }
    entries
}

/// Values of every `<option>` under a `<select>`.
pub fn option_values(doc: &Document, select: NodeId) -> Vec<String> {
    doc.descendants(select)
        .into_iter()
        .filter(|id| doc.element(*id).map(|e| e.tag == "option").unwrap_or(false))
        .map(|id| doc.option_value(id))
        .collect()
}
