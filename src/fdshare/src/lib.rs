//! `fdshare`: shows that descriptors produced by `dup()` share one open file
//! description (one offset, one set of status flags) while being closed
//! independently, and how bytes in a file hole look to different readers.

pub mod descriptor;
pub mod dump;
pub mod error;
pub mod fs_calls;
pub mod inspect;
pub mod sequence;

pub use descriptor::FileDescriptor;
pub use error::{DemoFailure, ErrorKind, SyscallError};
pub use sequence::{run_demo, DemoConfig, DemoSummary, Stage};

#[cfg(test)]
mod tests;
