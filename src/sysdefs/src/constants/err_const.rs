//! Errno values returned by the host kernel, and the helper used to fetch
//! the current one after a failed `libc` call.

// Let's not have clippy warn for EAGAIN, etc.
#![allow(clippy::upper_case_acronyms)]

#[doc(hidden)]
macro_rules! reversible_enum {
    ($(#[$settings: meta])* $visibility: vis enum $enumname:ident {
        $($valuename: ident = $value: expr,)*
    }) => {
        $(#[$settings])*
        $visibility enum $enumname {
            $($valuename = $value,)*
        }

        impl $enumname {
            $visibility fn from_discriminant(v: i32) -> Result<Self, ()> {
                match v {
                    $($value => Ok($enumname::$valuename),)*
                    _ => Err(()),
                }
            }
        }
    }
}

reversible_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(i32)]
    /// Errno values for OS calls
    pub enum Errno {
        EPERM = 1,	// Operation not permitted
        ENOENT = 2,     // No such file or directory
        ESRCH = 3,	// No such process
        EINTR = 4,	// Interrupted system call
        EIO = 5,	// I/O error
        ENXIO = 6,	// No such device or address
        EBIG = 7,	// Argument list too long
        ENOEXEC = 8,	// Exec format error
        EBADF = 9,	// Bad file number
        ECHILD = 10,	// No child processes
        EAGAIN = 11,	// Try again
        ENOMEM = 12,	// Out of memory
        EACCES = 13,	// Permission denied
        EFAULT = 14,	// Bad address
        ENOTBLK = 15,	// Block device required
        EBUSY = 16,	// Device or resource busy
        EEXIST = 17,	// File exists
        EXDEV = 18,	// Cross-device link
        ENODEV = 19,	// No such device
        ENOTDIR = 20,	// Not a directory
        EISDIR = 21,	// Is a directory
        EINVAL = 22,	// Invalid argument
        ENFILE = 23,	// File table overflow
        EMFILE = 24,	// Too many open files
        ENOTTY = 25,	// Not a typewriter
        ETXTBSY = 26,	// Text file busy
        EFBIG = 27,	// File too large
        ENOSPC = 28,	// No space left on device
        ESPIPE = 29,	// Illegal seek
        EROFS = 30,	// Read-only file system
        EMLINK = 31,	// Too many links
        EPIPE = 32,	// Broken pipe
        ENAMETOOLONG = 36,	// File name too long
        ELOOP = 40,	// Too many symbolic links encountered
        EOVERFLOW = 75,	// Value too large for defined data type
        EBADFD = 77,	// File descriptor in bad state
        EDQUOT = 122,	// Quota exceeded
    }
}

impl Errno {
    /// Raw numeric value, as the kernel reports it.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Reads `errno` for the calling thread.
pub fn get_errno() -> i32 {
    (unsafe { *libc::__errno_location() }) as i32
}
