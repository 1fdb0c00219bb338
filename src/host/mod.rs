pub mod inline_config;
pub mod page;

pub use inline_config::{ConfigError, InlineConfig, ValidationDefinition, apply_validation_patterns};
pub use page::{PageHost, RecordingHost};
