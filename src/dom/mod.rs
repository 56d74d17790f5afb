pub mod dom_model;
pub mod form;
pub mod parser;
