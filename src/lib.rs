//! Headless controller for the psychological profile single-page site.
//!
//! The page (render target, panel buttons, live form) is modelled by
//! [`ui::ui_state::UiState`] and driven by [`ui::controller::UiController`]
//! over any [`transport::Transport`].

pub mod cli;
pub mod dom;
pub mod render;
pub mod report;
pub mod script;
pub mod trace;
pub mod transport;
pub mod ui;

pub use transport::http::HttpTransport;
pub use ui::controller::{ActionOutcome, UiController};
pub use ui::error::ClientError;
pub use ui::panel::PanelName;
