//! Dispatch-path failure taxonomy.
//!
//! Every failure between "prompt received" and "handler returned" is one
//! of these variants. The HTTP layer flattens them into a single
//! `{ "detail": … }` response; only [`DispatchError::Transport`] errors
//! carrying a quota signal are ever retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Network / HTTP-level failure talking to the completion endpoint.
    #[error("completion request failed: {0}")]
    Transport(String),

    /// The model replied without selecting any function.
    #[error("model response contained no function call")]
    NoFunctionSelected,

    /// The selected function name is not in the catalog (or has no handler).
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// The argument payload was not a JSON object.
    #[error("malformed arguments: {0}")]
    MalformedArguments(String),

    /// A required parameter was absent from the argument payload.
    #[error("task {task}: missing required parameter `{param}`")]
    MissingParameter { task: String, param: String },

    /// A supplied parameter failed its declared pattern.
    #[error("task {task}: parameter `{param}` rejected: {value:?}")]
    InvalidParameter {
        task: String,
        param: String,
        value: String,
    },

    /// The handler itself failed; its message is passed through.
    #[error("task {task} failed: {source}")]
    Handler {
        task: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// True when the error message carries a quota / rate-limit signal.
    ///
    /// This is the only failure class eligible for retry. Matches the
    /// usual proxy wordings plus a bare 429 status in the message.
    pub fn is_quota(&self) -> bool {
        match self {
            DispatchError::Transport(msg) => {
                let m = msg.to_ascii_lowercase();
                m.contains("quota") || m.contains("rate limit") || m.contains("429")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_signal_detected_in_transport() {
        let e = DispatchError::Transport("You exceeded your current quota".into());
        assert!(e.is_quota());
        let e =
            DispatchError::Transport("completion endpoint returned 429 Too Many Requests".into());
        assert!(e.is_quota());
    }

    #[test]
    fn non_transport_errors_are_never_quota() {
        let e = DispatchError::UnknownTask("quota".into());
        assert!(!e.is_quota());
        assert!(!DispatchError::NoFunctionSelected.is_quota());
    }

    #[test]
    fn plain_transport_error_is_not_quota() {
        let e = DispatchError::Transport("connection refused".into());
        assert!(!e.is_quota());
    }
}
