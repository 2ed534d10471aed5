//! Ways of looking at bytes that may contain zeros.
//!
//! The character dumpers emit exactly one output byte per input byte,
//! replacing anything unprintable with [`PLACEHOLDER`], so holes show up as
//! blank runs. [`c_str_prefix`] is the contrasting string-oriented view,
//! which ends at the first zero byte.

use std::io::Write;

use sysdefs::constants::demo_const::{DUMP_MAX_BYTES, PLACEHOLDER};
use sysdefs::constants::fs_const::{SEEK_END, SEEK_SET};
use tracing::warn;

use crate::descriptor::FileDescriptor;
use crate::error::{output_error, ErrorKind, SyscallError};

/// `isprint()` in the C locale: visible ASCII glyphs and the space.
pub fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

pub fn render_printable(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .map(|&b| if is_printable(b) { b } else { PLACEHOLDER })
        .collect()
}

/// What `printf("%s")` or `strlen()` would see of `buf`.
pub fn c_str_prefix(buf: &[u8]) -> &[u8] {
    match buf.iter().position(|&b| b == 0) {
        Some(end) => &buf[..end],
        None => buf,
    }
}

/// Buffer variant: nothing here can fail except the sink.
pub fn dump_buffer<W: Write>(out: &mut W, buf: &[u8]) -> Result<(), SyscallError> {
    out.write_all(&render_printable(buf)).map_err(output_error)
}

/// What [`dump_file`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDump {
    /// Size reported by seeking to the end.
    pub size: u64,
    /// Raw bytes read back, one `read()` per byte, at most
    /// [`DUMP_MAX_BYTES`] of them.
    pub contents: Vec<u8>,
}

impl FileDump {
    /// True when the file was larger than what got read back.
    pub fn is_truncated(&self) -> bool {
        (self.contents.len() as u64) < self.size
    }
}

/// File variant. Finds the size with a seek to the end, rewinds, then reads
/// the file one byte at a time, stopping after [`DUMP_MAX_BYTES`]. Leaves the
/// shared cursor just past the last byte read.
pub fn dump_file<W: Write>(out: &mut W, fd: &FileDescriptor) -> Result<FileDump, SyscallError> {
    let size = fd.seek(0, SEEK_END, ErrorKind::Read)?;
    writeln!(out, "File contains {} bytes.", size).map_err(output_error)?;

    fd.seek(0, SEEK_SET, ErrorKind::Read)?;
    write!(out, "Printing all characters in file:\n\n##############\n\n").map_err(output_error)?;

    let limit = size.min(DUMP_MAX_BYTES);
    let mut contents = Vec::new();
    let mut byte = [0u8; 1];
    for _ in 0..limit {
        if fd.read(&mut byte)? == 0 {
            warn!(fd = fd.raw(), expected = size, got = contents.len(), "file shrank during dump");
            break;
        }
        contents.push(byte[0]);
        let shown = if is_printable(byte[0]) { byte[0] } else { PLACEHOLDER };
        out.write_all(&[shown]).map_err(output_error)?;
    }

    let dump = FileDump { size, contents };
    if size > DUMP_MAX_BYTES {
        warn!(fd = fd.raw(), size, shown = limit, "file dump cut short");
        write!(out, "\n... {} more bytes not shown", size - limit).map_err(output_error)?;
    }
    write!(out, "\n\n##############\n\n").map_err(output_error)?;
    Ok(dump)
}
