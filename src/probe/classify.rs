//! Classification of probe failures that produced no upstream response.
//!
//! Connectivity problems recognized by their OS error kind get a prescriptive
//! 503 message. Everything else becomes a 500 carrying the error description.

use std::error::Error as StdError;
use std::io;

pub const NETWORK_UNREACHABLE_MESSAGE: &str = "Network unreachable while trying to reach Supabase. \
     Ensure your environment allows outbound HTTPS connections.";

pub const CONNECTION_REFUSED_MESSAGE: &str = "Supabase refused the connection. \
     Double-check the project URL and confirm the service is online.";

pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Status and message reported for a failed probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    pub status: u16,
    pub message: String,
}

/// System-level connectivity condition found in an error chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCode {
    NetworkUnreachable,
    ConnectionRefused,
}

impl SystemCode {
    fn from_io(err: &io::Error) -> Option<Self> {
        match err.kind() {
            io::ErrorKind::NetworkUnreachable => Some(Self::NetworkUnreachable),
            io::ErrorKind::ConnectionRefused => Some(Self::ConnectionRefused),
            _ => None,
        }
    }
}

/// Finds the first error in the chain that carries a recognized system code.
///
/// The search stops at the first match; later causes are not inspected.
pub fn find_system_code(err: &(dyn StdError + 'static)) -> Option<SystemCode> {
    std::iter::successors(Some(err), |&e| e.source())
        .filter_map(|e| e.downcast_ref::<io::Error>())
        .find_map(SystemCode::from_io)
}

/// Describes the error followed by its causes, skipping empty descriptions.
pub fn describe(err: &(dyn StdError + 'static)) -> Option<String> {
    let parts: Vec<String> = std::iter::successors(Some(err), |&e| e.source())
        .map(|e| e.to_string())
        .filter(|s| !s.trim().is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(": "))
    }
}

/// Maps a transport or runtime failure to the status and message of a check result.
pub fn normalize_network_error(err: &(dyn StdError + 'static)) -> NormalizedError {
    match find_system_code(err) {
        Some(SystemCode::NetworkUnreachable) => NormalizedError {
            status: 503,
            message: NETWORK_UNREACHABLE_MESSAGE.to_string(),
        },
        Some(SystemCode::ConnectionRefused) => NormalizedError {
            status: 503,
            message: CONNECTION_REFUSED_MESSAGE.to_string(),
        },
        None => NormalizedError {
            status: 500,
            message: describe(err).unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct RequestFailed(#[source] Box<dyn StdError + Send + Sync>);

    #[derive(Debug, thiserror::Error)]
    #[error("tcp connect error")]
    struct ConnectFailed(#[source] io::Error);

    #[derive(Debug, thiserror::Error)]
    #[error("")]
    struct Silent;

    fn wrapped(kind: io::ErrorKind) -> RequestFailed {
        RequestFailed(Box::new(ConnectFailed(io::Error::from(kind))))
    }

    #[test]
    fn test_connection_refused_is_503() {
        let err = wrapped(io::ErrorKind::ConnectionRefused);
        let normalized = normalize_network_error(&err);
        assert_eq!(normalized.status, 503);
        assert_eq!(normalized.message, CONNECTION_REFUSED_MESSAGE);
        assert!(normalized.message.contains("project URL"));
    }

    #[test]
    fn test_network_unreachable_is_503() {
        let err = wrapped(io::ErrorKind::NetworkUnreachable);
        let normalized = normalize_network_error(&err);
        assert_eq!(normalized.status, 503);
        assert_eq!(normalized.message, NETWORK_UNREACHABLE_MESSAGE);
    }

    #[test]
    fn test_top_level_io_error_is_classified() {
        let err = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(find_system_code(&err), Some(SystemCode::ConnectionRefused));
    }

    #[test]
    fn test_first_code_wins() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] io::Error);

        let inner = io::Error::new(
            io::ErrorKind::NetworkUnreachable,
            ConnectFailed(io::Error::from(io::ErrorKind::ConnectionRefused)),
        );
        let err = Outer(inner);
        assert_eq!(find_system_code(&err), Some(SystemCode::NetworkUnreachable));
    }

    #[test]
    fn test_other_errors_carry_description() {
        let err = RequestFailed(Box::new(io::Error::new(io::ErrorKind::Other, "dns error")));
        let normalized = normalize_network_error(&err);
        assert_eq!(normalized.status, 500);
        assert_eq!(normalized.message, "error sending request: dns error");
    }

    #[test]
    fn test_timeout_is_not_a_connectivity_code() {
        let err = wrapped(io::ErrorKind::TimedOut);
        let normalized = normalize_network_error(&err);
        assert_eq!(normalized.status, 500);
        assert!(normalized.message.starts_with("error sending request: tcp connect error"));
    }

    #[test]
    fn test_unknown_error_fallback() {
        let normalized = normalize_network_error(&Silent);
        assert_eq!(normalized.status, 500);
        assert_eq!(normalized.message, UNKNOWN_ERROR_MESSAGE);
    }
}
