use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// What the host shows for a failure: a toast, an inline field hint, or nothing at all
/// when `silent` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserNotice {
    pub code: &'static str,
    pub message: String,
    pub severity: Severity,
    pub silent: bool,
}
