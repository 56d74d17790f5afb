use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::dom::dom_model::{Document, NodeId};
use crate::dom::form::{checkbox_names, form_data_entries, named_items};

/// Wire value sent when there is no form to submit.
pub const REPEAT_SENTINEL: &str = "repeat";

/// One submitted field: checkbox groups are lists, everything else a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    Multi(Vec<String>),
}

/// Body of `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// No form was on the page; the server decides what that means.
    NoForm,
    Fields(BTreeMap<String, FieldValue>),
}

impl Serialize for Submission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Submission::NoForm => serializer.serialize_str(REPEAT_SENTINEL),
            Submission::Fields(fields) => fields.serialize(serializer),
        }
    }
}

impl Submission {
    /// Build the payload from the form as currently filled in.
    ///
    /// Every checkbox group starts as an empty list so an all-unchecked group
    /// is still sent. Checked boxes are appended to their group; any other
    /// field overwrites its key.
    pub fn from_form(doc: &Document, form: Option<NodeId>) -> Self {
        let Some(form) = form else {
            return Submission::NoForm;
        };

        let mut fields: BTreeMap<String, FieldValue> = checkbox_names(doc, form)
            .into_iter()
            .map(|name| (name, FieldValue::Multi(Vec::new())))
            .collect();

        for (name, value) in form_data_entries(doc, form) {
            let is_group = named_items(doc, form, &name)
                .first()
                .and_then(|id| doc.element(*id))
                .map(|e| e.control_type() == Some("checkbox"))
                .unwrap_or(false);

            if is_group {
                match fields
                    .entry(name)
                    .or_insert_with(|| FieldValue::Multi(Vec::new()))
                {
                    FieldValue::Multi(values) => values.push(value),
                    slot => *slot = FieldValue::Multi(vec![value]),
                }
            } else {
                fields.insert(name, FieldValue::Scalar(value));
            }
        }

        Submission::Fields(fields)
    }

    pub fn is_repeat(&self) -> bool {
        matches!(self, Submission::NoForm)
    }
}
