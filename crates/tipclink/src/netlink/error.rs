//! Error types for netlink operations.

use std::io;

/// Result type for netlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during netlink operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A step on a local (non-netlink) socket failed.
    #[error("{operation}: {source}")]
    Socket {
        /// The step that failed, e.g. "opening TIPC socket".
        operation: &'static str,
        /// The underlying OS error.
        source: io::Error,
    },

    /// Kernel returned an error code.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Kernel error with operation context.
    #[error("{operation}: {message} (errno {errno})")]
    KernelWithContext {
        /// The operation that failed.
        operation: String,
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Message was truncated.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected message length.
        expected: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// A response lacks an attribute the caller requires.
    #[error("missing attribute {group}.{attr} in response")]
    MissingAttribute {
        /// The attribute group that was searched.
        group: &'static str,
        /// The missing key.
        attr: &'static str,
    },

    /// Generic Netlink family is not registered in the kernel.
    #[error("generic netlink family not found: {name}")]
    FamilyNotFound {
        /// The family name that was looked up.
        name: String,
    },

    /// Node address text could not be parsed, or resolved to zero.
    #[error("invalid network address \"{0}\", syntax: Z.C.N")]
    InvalidAddress(String),

    /// Node identity text could not be parsed.
    #[error("Invalid node identity")]
    InvalidNodeIdentity(String),
}

impl Error {
    /// Create a kernel error from an errno value.
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Add context to this error.
    ///
    /// Wraps kernel errors with operation context. Other errors are returned unchanged.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Kernel { errno, message } => Self::KernelWithContext {
                operation: operation.into(),
                errno,
                message,
            },
            other => other,
        }
    }

    /// Check if this error was caused by operator input rather than the system.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress(_) | Self::InvalidNodeIdentity(_)
        )
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                matches!(*errno, libc::EPERM | libc::EACCES)
            }
            Self::Io(e) | Self::Socket { source: e, .. } => {
                e.kind() == io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => Some(*errno),
            Self::Socket { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_errno() {
        let err = Error::from_errno(-1); // EPERM
        assert!(err.is_permission_denied());
        assert_eq!(err.errno(), Some(1));
    }

    #[test]
    fn test_with_context() {
        let err = Error::from_errno(-13).with_context("setting node identity");
        assert!(err.is_permission_denied());
        let msg = err.to_string();
        assert!(msg.contains("setting node identity"));
        assert!(msg.contains("errno 13"));
    }

    #[test]
    fn test_with_context_leaves_other_errors() {
        let err = Error::InvalidMessage("short".into()).with_context("listing nodes");
        assert_eq!(err.to_string(), "invalid message: short");
    }

    #[test]
    fn test_error_classes() {
        assert!(Error::InvalidAddress("1.2".into()).is_invalid_argument());
        assert!(Error::InvalidNodeIdentity("zz".into()).is_invalid_argument());
        assert!(!Error::from_errno(-22).is_invalid_argument());

        let missing = Error::MissingAttribute {
            group: "net",
            attr: "id",
        };
        assert!(!missing.is_invalid_argument());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidNodeIdentity("xyz!".into()).to_string(),
            "Invalid node identity"
        );
        assert_eq!(
            Error::InvalidAddress("1.2".into()).to_string(),
            "invalid network address \"1.2\", syntax: Z.C.N"
        );
        assert_eq!(
            Error::FamilyNotFound {
                name: "TIPCv2".into()
            }
            .to_string(),
            "generic netlink family not found: TIPCv2"
        );
        let err = Error::Socket {
            operation: "opening TIPC socket",
            source: io::Error::from_raw_os_error(libc::EAFNOSUPPORT),
        };
        assert!(err.to_string().starts_with("opening TIPC socket: "));
        assert_eq!(err.errno(), Some(libc::EAFNOSUPPORT));
    }
}
