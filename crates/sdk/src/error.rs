//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// Client-side error talking to the queue daemon.
///
/// `Rpc` carries the daemon's numeric error code (4000-range for caller
/// mistakes such as invalid transitions, 5000-range for engine trouble).
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => SdkError::Rpc {
                code: call_err.code(),
                message: call_err.message().to_string(),
            },
            jsonrpsee::core::ClientError::Transport(e) => {
                SdkError::Transport(format!("Transport error: {}", e))
            }
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => {
                SdkError::Other(format!("Parse error: {}", e))
            }
            _ => SdkError::Other(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::types::ErrorObjectOwned;

    #[test]
    fn test_call_errors_keep_the_daemon_code() {
        let call = jsonrpsee::core::ClientError::Call(ErrorObjectOwned::owned(
            4002,
            "invalid queue status transition: attended -> attending",
            None::<()>,
        ));

        match SdkError::from(call) {
            SdkError::Rpc { code, message } => {
                assert_eq!(code, 4002);
                assert!(message.contains("invalid queue status transition"));
            }
            other => panic!("unexpected variant: {}", other),
        }
    }
}
