use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three optional views that can occupy the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelName {
    Form,
    Input,
    Profile,
}

/// Fixed description of a panel's toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelButton {
    pub element_id: &'static str,
    pub inactive_label: &'static str,
    pub active_label: &'static str,
}

const FORM_BUTTON: PanelButton = PanelButton {
    element_id: "view-form",
    inactive_label: "View Form",
    active_label: "Close Form",
};

const INPUT_BUTTON: PanelButton = PanelButton {
    element_id: "view-input",
    inactive_label: "Review",
    active_label: "Close Review",
};

const PROFILE_BUTTON: PanelButton = PanelButton {
    element_id: "view-profile",
    inactive_label: "View Profile",
    active_label: "Close Profile",
};

impl PanelName {
    /// Reset order used when every panel is closed.
    pub const ALL: [PanelName; 3] = [PanelName::Form, PanelName::Input, PanelName::Profile];

    pub fn button(&self) -> &'static PanelButton {
        match self {
            PanelName::Form => &FORM_BUTTON,
            PanelName::Input => &INPUT_BUTTON,
            PanelName::Profile => &PROFILE_BUTTON,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelName::Form => "form",
            PanelName::Input => "input",
            PanelName::Profile => "profile",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            PanelName::Form => 0,
            PanelName::Input => 1,
            PanelName::Profile => 2,
        }
    }
}

impl fmt::Display for PanelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "form" => Ok(PanelName::Form),
            "input" | "review" => Ok(PanelName::Input),
            "profile" => Ok(PanelName::Profile),
            other => Err(format!("unknown panel '{}' (expected form, input or profile)", other)),
        }
    }
}

/// What pressing a button does right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Fetch and render the panel
    Open(PanelName),
    /// Close the panel (reset its button)
    Close(PanelName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub label: String,
    pub action: ButtonAction,
}

impl ButtonState {
    pub fn inactive(panel: PanelName) -> Self {
        ButtonState {
            label: panel.button().inactive_label.to_string(),
            action: ButtonAction::Open(panel),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.action, ButtonAction::Close(_))
    }
}
