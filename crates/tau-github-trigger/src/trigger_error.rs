use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates fatal failures raised while normalizing a GitHub trigger.
pub enum TriggerContextError {
    #[error("{field} is required for {event}")]
    MissingField {
        field: &'static str,
        event: &'static str,
    },
    #[error("Unsupported event type: {0}")]
    UnsupportedEventType(String),
    #[error("Unsupported issue action: {0}")]
    UnsupportedIssueAction(String),
    #[error("invalid {event} payload: {message}")]
    InvalidPayload { event: String, message: String },
}

impl TriggerContextError {
    pub(crate) fn missing(field: &'static str, event: &'static str) -> Self {
        Self::MissingField { field, event }
    }
}
