use serde_json::{Map, Value};

use crate::dom::dom_model::{Document, NodeId};
use crate::dom::form::{group_type, named_items};
use crate::ui::ui_state::LOCKED_FORM_NAME;

/// Header shown above the review form.
pub const REVIEW_HEADER: &str = "<h2 class=\"view-header\">Your Responses</h2>";

/// Rename `form` so it can no longer be submitted, then fill every field named
/// in `data` and disable it.
///
/// Keys with no matching field are ignored. Radio and checkbox groups get each
/// option's checked state from membership in the stored answer, and every
/// option in the group is disabled whether checked or not. Any other field
/// shows an array answer as its items joined with commas.
pub fn lock_form(doc: &mut Document, form: NodeId, data: &Map<String, Value>) {
    doc.set_attr(form, "name", LOCKED_FORM_NAME);

    for (key, stored) in data {
        let items = named_items(doc, form, key);
        if items.is_empty() {
            continue;
        }
        let answers = answer_values(stored);

        match group_type(doc, &items).as_deref() {
            Some("checkbox") | Some("radio") => {
                for id in &items {
                    if let Some(e) = doc.element_mut(*id) {
                        if e.is_checkable() {
                            e.checked = answers.iter().any(|a| *a == e.value);
                        }
                        e.disabled = true;
                    }
                }
            }
            _ => {
                let value = answers.join(",");
                for id in &items {
                    if let Some(e) = doc.element_mut(*id) {
                        e.value = value.clone();
                        e.disabled = true;
                    }
                }
            }
        }
    }
}

/// A stored answer as a list of strings: arrays become their items, scalars a
/// single entry, `null` nothing.
pub fn answer_values(stored: &Value) -> Vec<String> {
    match stored {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(scalar_string).collect(),
        other => vec![scalar_string(other)],
    }
}

fn scalar_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
