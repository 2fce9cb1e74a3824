//! Error handling for the Fitness Sharks client
//!
//! Every failure is reported through [`Error`]. Its `Display` text is the
//! message shown to users, so the wording of the variants is part of the API.

use std::fmt;
use std::io;
use thiserror::Error;

use fitness_sharks_storage::StorageError;

/// Label used when a connection failure carries no I/O error kind
const UNKNOWN_CODE: &str = "ERR_CONNECTION";

/// Unified error type for the Fitness Sharks client
#[derive(Error, Debug)]
pub enum Error {
    /// The backend answered with a non-success status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// No response: host unreachable, name resolution failed or timed out
    #[error("Network error: Cannot reach backend server. Check if backend is running on port {port} and CORS is configured.")]
    Network { port: u16 },

    /// No response: the connection was actively refused
    #[error("Connection refused: Backend server is not running on port {port}.")]
    ConnectionRefused { port: u16 },

    /// No response: any other connection failure
    #[error("Connection error ({code}): Cannot connect to backend server on port {port}.")]
    Connection { code: String, port: u16 },

    /// Every probe candidate failed
    #[error("Cannot connect to backend server. Please ensure it is running on port {port}. If a development proxy is used, check that it forwards /api to the backend.")]
    Unreachable { port: u16 },

    /// The request could not be built or its body serialized
    #[error("Request error: {0}")]
    Request(String),

    /// A success response did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The backend answered without the expected auth outcome
    #[error("{0}")]
    Rejected(String),

    /// Session check answered without a user
    #[error("No active session")]
    NoActiveSession,

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Device-local storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new request error
    pub fn request<T: fmt::Display>(msg: T) -> Self {
        Error::Request(msg.to_string())
    }

    /// Create a new decode error
    pub fn decode<T: fmt::Display>(msg: T) -> Self {
        Error::Decode(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// True when no response was received, i.e. probing may help
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Error::Network { .. }
                | Error::ConnectionRefused { .. }
                | Error::Connection { .. }
                | Error::Unreachable { .. }
        )
    }

    /// HTTP status for server errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build a server error from a non-success response body. The body's
    /// `message` field wins over `error`; otherwise a generic text is used.
    pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error"].iter().find_map(|field| {
                    value
                        .get(field)
                        .and_then(serde_json::Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| format!("Server error: {}", status));

        Error::Server { status, message }
    }

    /// Classify a transport failure. `port` is the backend port named in the
    /// diagnostic text.
    pub(crate) fn from_transport(err: reqwest::Error, port: u16) -> Self {
        if err.is_builder() {
            return Error::Request(err.to_string());
        }
        if err.is_timeout() {
            return Error::Network { port };
        }

        let io_kind = io_source(&err).map(io::Error::kind);
        if err.is_connect() {
            return match io_kind {
                Some(io::ErrorKind::ConnectionRefused) => Error::ConnectionRefused { port },
                Some(kind) if is_socket_failure(kind) => Error::Connection {
                    code: format!("{:?}", kind),
                    port,
                },
                // name resolution, unreachable hosts, timeouts
                _ => Error::Network { port },
            };
        }
        if err.is_decode() {
            return Error::Decode(err.to_string());
        }
        if err.is_request() || err.is_body() {
            let code = io_kind
                .map(|kind| format!("{:?}", kind))
                .unwrap_or_else(|| UNKNOWN_CODE.to_string());
            return Error::Connection { code, port };
        }

        Error::Request(err.to_string())
    }
}

/// Failures of an established route to the host, as opposed to not finding
/// the host at all
fn is_socket_failure(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::AddrInUse
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
    )
}

fn io_source(err: &reqwest::Error) -> Option<&io::Error> {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<io::Error>() {
            return Some(io);
        }
        source = inner.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_field() {
        let err = Error::from_response(400, br#"{"message":"Plan name is required"}"#);
        assert_eq!(err.to_string(), "Plan name is required");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_server_error_field() {
        let err = Error::from_response(401, br#"{"error":"Invalid username or password"}"#);
        assert_eq!(err.to_string(), "Invalid username or password");
    }

    #[test]
    fn test_server_message_beats_error() {
        let err = Error::from_response(409, br#"{"error":"conflict","message":"email taken"}"#);
        assert_eq!(err.to_string(), "email taken");
    }

    #[test]
    fn test_server_fallback_text() {
        assert_eq!(
            Error::from_response(503, b"<html>down</html>").to_string(),
            "Server error: 503"
        );
        assert_eq!(
            Error::from_response(500, br#"{"message":""}"#).to_string(),
            "Server error: 500"
        );
    }

    #[test]
    fn test_network_messages_name_port() {
        let refused = Error::ConnectionRefused { port: 8080 }.to_string();
        let network = Error::Network { port: 8080 }.to_string();
        let other = Error::Connection {
            code: "ConnectionReset".to_string(),
            port: 8080,
        }
        .to_string();

        assert!(refused.contains("8080"));
        assert!(network.contains("8080"));
        assert!(other.contains("8080"));
        assert!(other.contains("ConnectionReset"));
        assert_ne!(refused, network);
    }

    #[test]
    fn test_socket_failures_during_connect() {
        assert!(is_socket_failure(io::ErrorKind::ConnectionReset));
        assert!(is_socket_failure(io::ErrorKind::PermissionDenied));
        assert!(!is_socket_failure(io::ErrorKind::TimedOut));
        assert!(!is_socket_failure(io::ErrorKind::Other));
        assert!(!is_socket_failure(io::ErrorKind::ConnectionRefused));
    }

    #[test]
    fn test_is_connectivity() {
        assert!(Error::Network { port: 1 }.is_connectivity());
        assert!(!Error::from_response(500, b"").is_connectivity());
        assert!(!Error::NoActiveSession.is_connectivity());
    }
}
