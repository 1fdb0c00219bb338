pub mod pattern;
pub mod sanitize;
