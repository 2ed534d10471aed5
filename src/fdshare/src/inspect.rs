//! Side-by-side comparison of two descriptors.
//!
//! Both inspectors answer the same question in a tri-state way: `Ok(Equal)`,
//! `Ok(Unequal)`, or `Err` when the query itself failed on either side.

use std::fmt;

use crate::descriptor::FileDescriptor;
use crate::error::SyscallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Unequal,
}

impl Comparison {
    fn of<T: PartialEq>(a: &T, b: &T) -> Self {
        if a == b {
            Comparison::Equal
        } else {
            Comparison::Unequal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagReport {
    pub first: i32,
    pub second: i32,
    pub comparison: Comparison,
}

impl fmt::Display for FlagReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.comparison {
            Comparison::Equal => writeln!(f, "\nOpen file access flags for fd1 and fd2 are the same."),
            Comparison::Unequal => writeln!(f, "\nOpen file access flags for fd1 and fd2 don't match."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetReport {
    pub first: u64,
    pub second: u64,
    pub comparison: Comparison,
}

impl fmt::Display for OffsetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\noffset1: {}, offset2: {}", self.first, self.second)?;
        match self.comparison {
            Comparison::Equal => writeln!(f, "File offsets for fd1 and fd2 are the same"),
            Comparison::Unequal => writeln!(f, "File offsets for fd1 and fd2 don't match."),
        }
    }
}

/// Compares the `F_GETFL` flags seen through `a` and `b`.
pub fn check_flags(a: &FileDescriptor, b: &FileDescriptor) -> Result<FlagReport, SyscallError> {
    let first = a.status_flags()?;
    let second = b.status_flags()?;
    Ok(FlagReport {
        first,
        second,
        comparison: Comparison::of(&first, &second),
    })
}

/// Compares the current offsets seen through `a` and `b`.
pub fn check_offsets(a: &FileDescriptor, b: &FileDescriptor) -> Result<OffsetReport, SyscallError> {
    let first = a.offset()?;
    let second = b.offset()?;
    Ok(OffsetReport {
        first,
        second,
        comparison: Comparison::of(&first, &second),
    })
}
