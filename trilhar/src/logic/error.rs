use thiserror::Error;

/// Failures talking to the context broker.
///
/// Neither kind ever reaches the user as an error: the status reader turns
/// both into the disconnected snapshot and the command sender into a
/// notification.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Connection refused, timeout, or a non-2xx answer
    #[error("broker unreachable: {0}")]
    Transport(String),

    /// The broker answered but the body is not a twin entity
    #[error("unexpected response shape: {0}")]
    DataShape(String),
}

impl From<reqwest::Error> for BrokerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BrokerError::DataShape(err.to_string())
        } else if err.is_timeout() {
            BrokerError::Transport(format!("timed out: {}", err))
        } else {
            BrokerError::Transport(err.to_string())
        }
    }
}
