use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ui::panel::PanelName;

/// A named sequence of user actions run against one controller, loaded from
/// YAML or JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionScript {
    /// Human-readable name for this session
    pub name: String,

    /// Ordered list of steps to execute
    pub steps: Vec<ScriptStep>,
}

/// A single step in a session script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Press "View Form"
    OpenForm,

    /// Set fields of the rendered form
    Fill {
        values: BTreeMap<String, FillValue>,
    },

    /// Press "Submit"
    Submit,

    /// Press "Analyse"
    Analyze,

    /// Press "Review"
    Review,

    /// Press "View Profile"
    Profile,

    /// Press a panel button, whatever it is currently bound to
    Press { panel: PanelName },

    /// Close a panel if it is open
    Close { panel: PanelName },

    /// Press the logo (reload the home page)
    Home,

    /// Check the current page
    Assert { assertions: Vec<AssertionSpec> },
}

/// Value(s) to put in a form field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FillValue {
    One(String),
    Many(Vec<String>),
}

impl FillValue {
    pub fn to_values(&self) -> Vec<String> {
        match self {
            FillValue::One(v) => vec![v.clone()],
            FillValue::Many(vs) => vs.clone(),
        }
    }
}

/// A check against the current page state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssertionSpec {
    /// Render target text contains the expected string
    TextPresent { expected: String },

    /// Render target text does not contain the expected string
    TextAbsent { expected: String },

    /// A message is shown and equals the expected text
    MessageEquals { expected: String },

    /// The given panel is the open one
    PanelActive { panel: PanelName },

    /// No panel is open
    NoPanelActive,

    /// Every control named `field` in the rendered form is disabled
    FieldDisabled { field: String },
}

/// Outcome of one assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    pub step_index: usize,
    pub spec: AssertionSpec,
    pub passed: bool,
    pub actual: Option<String>,
    pub message: Option<String>,
}

/// Outcome of a whole script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptResult {
    pub script_name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub assertion_results: Vec<AssertionResult>,
    pub error: Option<String>,
}
