pub mod controller;
pub mod error;
pub mod panel;
pub mod submission;
pub mod ui_state;
