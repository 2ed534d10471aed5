//! Owned kernel descriptor.
//!
//! A [`FileDescriptor`] is released exactly once: either explicitly through
//! [`FileDescriptor::close`], which reports the outcome, or on drop as a
//! backstop, which can only log it.

use sysdefs::constants::err_const::Errno;
use sysdefs::constants::fs_const::{SEEK_CUR, SEEK_END, SEEK_SET};
use tracing::{error, trace};

use crate::error::{syscall_error, ErrorKind, SyscallError};
use crate::fs_calls::{
    close_syscall, dup_syscall, fcntl_getfl_syscall, lseek_syscall, open_syscall, read_syscall,
    write_syscall, WriteOutcome,
};

#[derive(Debug)]
pub struct FileDescriptor {
    fd: i32,
    label: &'static str,
    open: bool,
}

impl FileDescriptor {
    pub fn open(path: &str, oflag: i32, mode: u32, label: &'static str) -> Result<Self, SyscallError> {
        let fd = open_syscall(path, oflag, mode)?;
        Ok(FileDescriptor { fd, label, open: true })
    }

    /// A second descriptor on the same open file description.
    pub fn duplicate(&self, label: &'static str) -> Result<Self, SyscallError> {
        let fd = dup_syscall(self.fd)?;
        Ok(FileDescriptor { fd, label, open: true })
    }

    pub fn raw(&self) -> i32 {
        self.fd
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// `F_GETFL` flags of the underlying open file description.
    pub fn status_flags(&self) -> Result<i32, SyscallError> {
        fcntl_getfl_syscall(self.fd)
    }

    /// Current position of the shared cursor.
    pub fn offset(&self) -> Result<u64, SyscallError> {
        lseek_syscall(self.fd, 0, SEEK_CUR, ErrorKind::Inspect)
    }

    pub fn seek(&self, offset: i64, whence: i32, kind: ErrorKind) -> Result<u64, SyscallError> {
        lseek_syscall(self.fd, offset, whence, kind)
    }

    pub fn rewind(&self) -> Result<(), SyscallError> {
        lseek_syscall(self.fd, 0, SEEK_SET, ErrorKind::Read).map(|_| ())
    }

    /// File size via a seek to the end. The cursor is put back where it was.
    pub fn size(&self) -> Result<u64, SyscallError> {
        let here = lseek_syscall(self.fd, 0, SEEK_CUR, ErrorKind::Read)?;
        let end = lseek_syscall(self.fd, 0, SEEK_END, ErrorKind::Read)?;
        lseek_syscall(self.fd, here as i64, SEEK_SET, ErrorKind::Read)?;
        Ok(end)
    }

    pub fn write(&self, payload: &[u8], count: usize) -> Result<WriteOutcome, SyscallError> {
        let outcome = write_syscall(self.fd, payload, count)?;
        trace!(label = self.label, ?outcome, "write");
        Ok(outcome)
    }

    /// Moves the cursor `gap` bytes past end-of-file and writes `payload`
    /// there. The skipped range becomes a hole. A gap that does not fit in
    /// `off_t` is rejected before the cursor moves.
    pub fn write_past_end(&self, gap: u64, payload: &[u8]) -> Result<WriteOutcome, SyscallError> {
        let gap = i64::try_from(gap)
            .map_err(|_| syscall_error(ErrorKind::Write, Errno::EINVAL, "lseek", "gap does not fit in off_t"))?;
        lseek_syscall(self.fd, gap, SEEK_END, ErrorKind::Write)?;
        self.write(payload, payload.len())
    }

    pub fn read(&self, buf: &mut [u8]) -> Result<usize, SyscallError> {
        read_syscall(self.fd, buf)
    }

    /// Releases this reference. Other duplicates of the description stay open.
    pub fn close(mut self) -> Result<(), SyscallError> {
        self.open = false;
        close_syscall(self.fd)
    }
}

impl Drop for FileDescriptor {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = close_syscall(self.fd) {
            error!(label = self.label, fd = self.fd, %e, "close on drop failed");
        }
    }
}
