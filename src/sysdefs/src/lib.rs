//! Constants and errno definitions for the `fdshare` syscall layer.
//!
//! Values mirror the Linux ABI (`include/uapi/asm-generic/*`) so callers can
//! pass them straight through to `libc`.

pub mod constants;
