use serde::Serialize;

/// Where a submission attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Collecting,
    BotCheck,
    AwaitingFetch,
    Reconciling,
    Settling,
}
