pub mod locked_form;
pub mod profile;
pub mod profile_model;
pub mod verdict;
