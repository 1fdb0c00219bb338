pub mod alert_model;
pub mod presenter;
pub mod queue;

pub use alert_model::{Alert, AlertKind, AlertNode};
pub use presenter::{ConsolePresenter, InstantPresenter, Presenter, TimedPresenter};
pub use queue::AlertQueue;
