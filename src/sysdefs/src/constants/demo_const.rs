//! Fixed parameters of the descriptor-sharing demonstration.
//!
//! There is no runtime configuration: the path, permissions and payloads are
//! part of what the demonstration shows, so they live here as constants.

use crate::constants::fs_const::{O_CREAT, O_RDWR, S_IRUSR, S_IWUSR};

/// Scratch file shared by every run. Never truncated or removed, so content
/// from earlier runs stays in place.
pub const DEMO_FILE_PATH: &str = "/tmp/file.txt";

/// Read-write, create if absent, no truncate.
pub const DEMO_OPEN_FLAGS: i32 = O_RDWR | O_CREAT;

/// Owner-only read/write.
pub const DEMO_FILE_MODE: u32 = S_IRUSR | S_IWUSR;

/// Capacity of the fixed buffer filled by the bulk read.
pub const READ_BUF_SIZE: usize = 50;

/// Most bytes the file dump reads back and prints. The backing file is
/// shared and never truncated, so it can be arbitrarily large or sparse.
pub const DUMP_MAX_BYTES: u64 = 64 * 1024;

/// First write, issued through the primary descriptor.
pub const FIRST_PAYLOAD: &[u8] = b"aaaaa";

/// Second write, issued through the duplicate. The requested length is
/// larger than the payload; the extra bytes are written as zeros.
pub const SECOND_PAYLOAD: &[u8] = b"bbbbb";
pub const SECOND_REQUEST_LEN: usize = 7;

/// Third write, issued through the duplicate.
pub const THIRD_PAYLOAD: &[u8] = b"ccc";

/// Byte emitted by the character dumpers in place of anything unprintable.
pub const PLACEHOLDER: u8 = b' ';
