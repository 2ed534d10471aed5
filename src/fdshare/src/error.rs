//! Error taxonomy for the descriptor-sharing sequence.
//!
//! Every failing `libc` call is turned into a [`SyscallError`] at the call
//! site: the kind of step that failed, the name of the syscall, the raw errno
//! and the platform's text for it. Nothing here retries.

use std::fmt;
use std::io;

use sysdefs::constants::err_const::Errno;
use tracing::debug;

use crate::sequence::Stage;

/// Which step of the sequence a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Duplicate,
    /// Flag or offset query.
    Inspect,
    Write,
    Read,
    Close,
    /// Writing demonstration text to the output sink.
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Open => "OpenError",
            ErrorKind::Duplicate => "DuplicateError",
            ErrorKind::Inspect => "InspectError",
            ErrorKind::Write => "WriteError",
            ErrorKind::Read => "ReadError",
            ErrorKind::Close => "CloseError",
            ErrorKind::Output => "OutputError",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallError {
    pub kind: ErrorKind,
    /// Name of the failing operation, e.g. `"open"` or `"lseek"`.
    pub syscall: &'static str,
    /// Raw errno as reported by the kernel.
    pub code: i32,
    pub message: String,
}

impl SyscallError {
    /// The errno as a typed value, if it is one we know about.
    pub fn errno(&self) -> Option<Errno> {
        Errno::from_discriminant(self.code).ok()
    }
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.syscall, self.message)
    }
}

impl std::error::Error for SyscallError {}

/// Builds an error for a condition detected before reaching the kernel
/// (bad whence, interior nul in a path, ...).
pub fn syscall_error(kind: ErrorKind, errno: Errno, syscall: &'static str, message: &str) -> SyscallError {
    debug!(%kind, syscall, errno = errno.code(), reason = message, "syscall error");
    SyscallError {
        kind,
        syscall,
        code: errno.code(),
        message: message.to_string(),
    }
}

/// Builds an error from the errno left behind by a failed `libc` call.
pub fn handle_errno(kind: ErrorKind, errno: i32, syscall: &'static str) -> SyscallError {
    let message = io::Error::from_raw_os_error(errno).to_string();
    debug!(%kind, syscall, errno, text = %message, "kernel returned error");
    SyscallError {
        kind,
        syscall,
        code: errno,
        message,
    }
}

/// Maps a failure to write demonstration text.
pub fn output_error(err: io::Error) -> SyscallError {
    let code = err.raw_os_error().unwrap_or(Errno::EIO.code());
    SyscallError {
        kind: ErrorKind::Output,
        syscall: "write(output)",
        code,
        message: err.to_string(),
    }
}

/// A run that stopped before reaching `Done`.
#[derive(Debug)]
pub struct DemoFailure {
    /// Last stage completed before the failing step.
    pub stage: Stage,
    pub error: SyscallError,
    /// Close failures hit while releasing descriptors after `error`. They
    /// are reported alongside it, never in place of it.
    pub cleanup: Vec<SyscallError>,
}

impl fmt::Display for DemoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} after {}: {}", self.error.kind, self.stage, self.error)
    }
}

impl std::error::Error for DemoFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
