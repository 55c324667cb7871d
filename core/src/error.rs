//! Error types for the RMS client.
//!
//! # Design
//! A successful HTTP exchange is not a successful call: RMS reports business
//! failures inside the body's message list. Those land in the two semantic
//! variants (`EmptyMessageList`, `Rejected`), kept apart from transport and
//! decode failures so callers can tell "the network broke" from "RMS said no".

use thiserror::Error;

use crate::datetime::FormatError;

/// Errors returned by `RmsClient` and `RmsApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential has been set; no request was built.
    #[error("Uninitialized")]
    Uninitialized,

    /// Credentials or client configuration are unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// Non-2xx response that carried no body to decode.
    #[error("HTTP {status} with empty body")]
    HttpStatus { status: u16 },

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the expected envelope.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The envelope decoded but its message list was empty. RMS answers this
    /// way when authentication failed.
    #[error("response carried no messages")]
    EmptyMessageList,

    /// The leading message did not report success.
    #[error("{message_type} {code}: {message}")]
    Rejected {
        message_type: String,
        code: String,
        message: String,
    },
}

impl ApiError {
    /// True for failures reported by RMS inside a decodable response.
    pub fn is_semantic(&self) -> bool {
        matches!(self, ApiError::EmptyMessageList | ApiError::Rejected { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::HttpStatus { .. })
    }
}

impl From<FormatError> for ApiError {
    fn from(err: FormatError) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<quick_xml::DeError> for ApiError {
    fn from(err: quick_xml::DeError) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_message_matches_upstream_text() {
        assert_eq!(ApiError::Uninitialized.to_string(), "Uninitialized");
    }

    #[test]
    fn classification() {
        assert!(ApiError::EmptyMessageList.is_semantic());
        assert!(ApiError::Rejected {
            message_type: "ERROR".into(),
            code: "ORDER_EXT_API_UPDATE_ORDERMEMO_ERROR_001".into(),
            message: "bad".into(),
        }
        .is_semantic());
        assert!(ApiError::HttpStatus { status: 503 }.is_transport());
        assert!(ApiError::Transport("refused".into()).is_transport());
        assert!(!ApiError::Decode("x".into()).is_semantic());
        assert!(!ApiError::Uninitialized.is_transport());
    }

    #[test]
    fn format_error_becomes_decode_error() {
        let err: ApiError = crate::datetime::decode_date("nope").unwrap_err().into();
        assert!(matches!(err, ApiError::Decode(msg) if msg.contains("YYYY-MM-DD")));
    }
}
