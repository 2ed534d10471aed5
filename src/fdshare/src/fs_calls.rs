//! Thin wrappers over the raw `libc` file syscalls.
//!
//! Each wrapper calls straight into the kernel and converts a negative return
//! into a [`SyscallError`] tagged with the step it belongs to. Descriptors
//! are plain `i32`s here; ownership lives in [`crate::descriptor`].

use std::borrow::Cow;
use std::ffi::CString;

use libc::c_void;
use sysdefs::constants::err_const::{get_errno, Errno};
use sysdefs::constants::fs_const::{F_GETFL, SEEK_CUR, SEEK_END, SEEK_SET};
use tracing::{debug, warn};

use crate::error::{handle_errno, syscall_error, ErrorKind, SyscallError};

/// Result of a single `write()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Length handed to the kernel.
    pub requested: usize,
    /// Bytes the kernel actually transferred; the shared cursor moved by this much.
    pub written: usize,
}

impl WriteOutcome {
    pub fn is_short(&self) -> bool {
        self.written < self.requested
    }
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/open.2.html
///
/// Opens `path` with `oflag`, creating it with `mode` when `O_CREAT` is set.
/// Returns the new kernel descriptor.
pub fn open_syscall(path: &str, oflag: i32, mode: u32) -> Result<i32, SyscallError> {
    let c_path = CString::new(path).map_err(|_| {
        syscall_error(ErrorKind::Open, Errno::EINVAL, "open", "path contains a nul byte")
    })?;

    let kernel_fd = unsafe { libc::open(c_path.as_ptr(), oflag, mode as libc::c_uint) };
    if kernel_fd < 0 {
        return Err(handle_errno(ErrorKind::Open, get_errno(), "open"));
    }
    debug!(path, oflag, mode, kernel_fd, "open");
    Ok(kernel_fd)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/dup.2.html
///
/// The returned descriptor refers to the same open file description as `fd`:
/// one offset, one set of status flags. `FD_CLOEXEC` is not inherited.
pub fn dup_syscall(fd: i32) -> Result<i32, SyscallError> {
    let ret_kernelfd = unsafe { libc::dup(fd) };
    if ret_kernelfd < 0 {
        return Err(handle_errno(ErrorKind::Duplicate, get_errno(), "dup"));
    }
    debug!(fd, ret_kernelfd, "dup");
    Ok(ret_kernelfd)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/fcntl.2.html
///
/// `fcntl(fd, F_GETFL)`: access mode and status flags of the open file
/// description behind `fd`.
pub fn fcntl_getfl_syscall(fd: i32) -> Result<i32, SyscallError> {
    let ret = unsafe { libc::fcntl(fd, F_GETFL) };
    if ret < 0 {
        return Err(handle_errno(ErrorKind::Inspect, get_errno(), "fcntl"));
    }
    Ok(ret)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/lseek.2.html
///
/// Repositions the offset of the open file description behind `fd`. Seeking
/// past end-of-file is allowed; a later write there leaves a hole. `kind`
/// says which step is seeking, since a query, a rewind and a size query fail
/// differently.
pub fn lseek_syscall(fd: i32, offset: i64, whence: i32, kind: ErrorKind) -> Result<u64, SyscallError> {
    match whence {
        SEEK_SET | SEEK_CUR | SEEK_END => {}
        _ => return Err(syscall_error(kind, Errno::EINVAL, "lseek", "invalid whence parameter")),
    }

    let ret = unsafe { libc::lseek(fd, offset as libc::off_t, whence) };
    if ret < 0 {
        return Err(handle_errno(kind, get_errno(), "lseek"));
    }
    Ok(ret as u64)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/write.2.html
///
/// Writes `count` bytes at the current offset. When `count` is larger than
/// `payload` the request is padded with zero bytes up to `count`, the same
/// bytes a C caller passing a string literal with an oversized length puts on
/// disk (terminator plus zeroed neighbour). A short write is not an error; it
/// is reported through [`WriteOutcome::is_short`].
pub fn write_syscall(fd: i32, payload: &[u8], count: usize) -> Result<WriteOutcome, SyscallError> {
    // early return
    if count == 0 {
        return Ok(WriteOutcome { requested: 0, written: 0 });
    }

    let request: Cow<'_, [u8]> = if count <= payload.len() {
        Cow::Borrowed(&payload[..count])
    } else {
        let mut padded = payload.to_vec();
        padded.resize(count, 0);
        Cow::Owned(padded)
    };

    let ret = unsafe { libc::write(fd, request.as_ptr() as *const c_void, request.len()) };
    if ret < 0 {
        return Err(handle_errno(ErrorKind::Write, get_errno(), "write"));
    }

    let outcome = WriteOutcome {
        requested: count,
        written: ret as usize,
    };
    if outcome.is_short() {
        warn!(fd, requested = outcome.requested, written = outcome.written, "short write");
    }
    Ok(outcome)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/read.2.html
///
/// Reads up to `buf.len()` bytes from the current offset. Stops at
/// end-of-file; holes read back as zero bytes and count toward the total.
pub fn read_syscall(fd: i32, buf: &mut [u8]) -> Result<usize, SyscallError> {
    // Early return if count is zero.
    if buf.is_empty() {
        return Ok(0);
    }

    let ret = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut c_void, buf.len()) };
    if ret < 0 {
        return Err(handle_errno(ErrorKind::Read, get_errno(), "read"));
    }
    Ok(ret as usize)
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/close.2.html
///
/// Drops one reference to the open file description. Other descriptors
/// duplicated from the same one stay valid. Closing a number that is not
/// open fails with `EBADF`.
pub fn close_syscall(fd: i32) -> Result<(), SyscallError> {
    let ret = unsafe { libc::close(fd) };
    if ret < 0 {
        let errno = get_errno();
        if errno == Errno::EBADF.code() {
            return Err(syscall_error(ErrorKind::Close, Errno::EBADF, "close", "Bad File Descriptor"));
        }
        return Err(handle_errno(ErrorKind::Close, errno, "close"));
    }
    debug!(fd, "close");
    Ok(())
}
