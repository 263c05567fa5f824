//! Error types shared by the netlink, ioctl and rfkill layers.
//!
//! Every failure is reported as an [`Error`]. Callers that only care about
//! the broad category use [`Error::kind`]; callers that interoperate with
//! POSIX conventions use [`Error::code`] and [`Error::message`], which mirror
//! the `(errno, strerror)` pair. Codes below zero denote protocol-level
//! failures with no errno equivalent.

use std::io;

/// Result type for nlwifi operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Code reported by [`Error::code`] for failures outside the errno table.
pub const EUNDEF: i32 = -1;

/// Broad error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or truncated wire data.
    Format,
    /// The kernel answered with an explicit negative error code.
    Netlink,
    /// A family, device, phy or rfkill index could not be resolved.
    NotFound,
    /// No reply within the configured receive window.
    Timeout,
    /// Insufficient privilege for the socket, device or ioctl.
    Permission,
    /// A caller-supplied value was rejected before anything was sent.
    InvalidInput,
    /// Any other operating-system failure.
    Io,
}

/// Errors that can occur while talking to the kernel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket or device operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

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

    /// A kernel datagram did not fit the receive buffer.
    #[error("reply of {size} bytes exceeds the {limit} byte receive limit")]
    ReplyTooLarge {
        /// Size reported by the kernel.
        size: usize,
        /// Configured receive limit.
        limit: usize,
    },

    /// Generic netlink family is not registered.
    #[error("generic netlink family not found: {name}")]
    FamilyNotFound {
        /// The family name that was not found.
        name: String,
    },

    /// Interface not found.
    #[error("interface not found: {name}")]
    InterfaceNotFound {
        /// The interface name (or `ifindex:N`) that was not found.
        name: String,
    },

    /// Wireless phy not found.
    #[error("phy not found: phy{phy}")]
    PhyNotFound {
        /// The phy index that was not found.
        phy: u32,
    },

    /// Rfkill device not found.
    #[error("rfkill device not found: {index}")]
    RfkillNotFound {
        /// The rfkill index that was not found.
        index: u32,
    },

    /// No reply arrived in time.
    #[error("timed out waiting for {operation}")]
    Timeout {
        /// What was being waited for.
        operation: String,
    },

    /// Permission denied opening or operating on a kernel interface.
    #[error("permission denied: {operation}")]
    PermissionDenied {
        /// The operation that was refused.
        operation: String,
    },

    /// Caller-supplied value rejected before sending.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not supported.
    #[error("operation not supported: {0}")]
    NotSupported(String),
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

    /// Create a kernel error carrying the kernel's extended ACK text.
    pub fn from_errno_with_message(errno: i32, text: &str) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message: format!("{message}: {text}"),
        }
    }

    /// Create a kernel error with operation context.
    pub fn from_errno_with_context(errno: i32, operation: impl Into<String>) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::KernelWithContext {
            operation: operation.into(),
            errno: -errno,
            message,
        }
    }

    /// Classify an OS error raised while performing `operation`.
    ///
    /// Permission and timeout conditions get their own variants so callers
    /// can match on them without inspecting the raw errno.
    pub fn from_io(err: io::Error, operation: impl Into<String>) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                operation: operation.into(),
            },
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Self::Timeout {
                operation: operation.into(),
            },
            _ => Self::Io(err),
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

    /// Broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        if self.is_permission_denied() {
            return ErrorKind::Permission;
        }
        if self.is_not_found() {
            return ErrorKind::NotFound;
        }
        match self {
            Self::Kernel { .. } | Self::KernelWithContext { .. } => ErrorKind::Netlink,
            Self::Truncated { .. }
            | Self::InvalidMessage(_)
            | Self::InvalidAttribute(_)
            | Self::ReplyTooLarge { .. } => ErrorKind::Format,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::InvalidArgument(_) | Self::NotSupported(_) => ErrorKind::InvalidInput,
            Self::Io(e) if e.kind() == io::ErrorKind::TimedOut => ErrorKind::Timeout,
            _ => ErrorKind::Io,
        }
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV, etc.).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                matches!(*errno, libc::ENOENT | libc::ENODEV)
            }
            Self::FamilyNotFound { .. }
            | Self::InterfaceNotFound { .. }
            | Self::PhyNotFound { .. }
            | Self::RfkillNotFound { .. } => true,
            _ => false,
        }
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                matches!(*errno, libc::EPERM | libc::EACCES)
            }
            Self::PermissionDenied { .. } => true,
            Self::Io(e) => e.kind() == io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Check if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }

    /// Check if this is a "device busy" error (EBUSY).
    pub fn is_busy(&self) -> bool {
        self.errno() == Some(libc::EBUSY)
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// POSIX-style numeric code.
    ///
    /// Positive errno for kernel and OS failures, [`EUNDEF`] for protocol
    /// failures that have no errno.
    pub fn code(&self) -> i32 {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => *errno,
            Self::Io(e) => e.raw_os_error().unwrap_or(EUNDEF),
            Self::PermissionDenied { .. } => libc::EPERM,
            Self::Timeout { .. } => libc::ETIMEDOUT,
            Self::FamilyNotFound { .. } => libc::ENOENT,
            Self::InterfaceNotFound { .. } | Self::PhyNotFound { .. } => libc::ENODEV,
            Self::RfkillNotFound { .. } => libc::ENOENT,
            Self::InvalidArgument(_) => libc::EINVAL,
            Self::NotSupported(_) => libc::EOPNOTSUPP,
            Self::Truncated { .. }
            | Self::InvalidMessage(_)
            | Self::InvalidAttribute(_)
            | Self::ReplyTooLarge { .. } => EUNDEF,
        }
    }

    /// Human-readable message paired with [`code`](Self::code).
    pub fn message(&self) -> String {
        self.to_string()
    }
}
