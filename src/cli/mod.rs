pub mod commands;
pub mod config;
pub mod form_spec;
