pub mod debug;
pub mod logger;
pub mod trace;
